use serde::{Deserialize, Serialize};

pub const ACTIVITIES_PATH: &str = "/activities";

/// Body of a successful signup or unregister response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of a rejected request. The server may omit `detail`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// `/activities/{name}/signup?email={email}` with both components
/// percent-encoded.
pub fn signup_path(activity: &str, email: &str) -> String {
    format!(
        "{ACTIVITIES_PATH}/{}/signup?email={}",
        urlencoding::encode(activity),
        urlencoding::encode(email)
    )
}

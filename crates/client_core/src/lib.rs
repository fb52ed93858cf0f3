//! HTTP client for the activity roster server: roster fetches and the
//! enroll/unenroll mutations.

use async_trait::async_trait;
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use shared::{
    domain::Roster,
    error::ClientError,
    protocol::{signup_path, ErrorResponse, MessageResponse, ACTIVITIES_PATH},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const NO_STORE: &str = "no-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Enroll,
    Unenroll,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enroll => "enroll",
            Self::Unenroll => "unenroll",
        }
    }

    fn default_success(self, email: &str) -> String {
        match self {
            Self::Enroll => format!("Signed up {email}"),
            Self::Unenroll => format!("Unregistered {email}"),
        }
    }

    fn default_rejection(self) -> &'static str {
        match self {
            Self::Enroll => "An error occurred",
            Self::Unenroll => "Failed to unregister",
        }
    }

    fn default_network_failure(self) -> &'static str {
        match self {
            Self::Enroll => "Failed to sign up. Please try again.",
            Self::Unenroll => "Failed to unregister",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub kind: MutationKind,
    pub message: String,
}

/// A failed enroll/unenroll. `message` is what the user gets to see: the
/// server detail when there was one, otherwise the per-operation default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MutationFailure {
    pub kind: MutationKind,
    pub message: String,
    pub cause: ClientError,
}

impl MutationFailure {
    pub fn new(kind: MutationKind, cause: ClientError) -> Self {
        let message = match &cause {
            ClientError::Rejected { .. } => cause
                .detail()
                .unwrap_or(kind.default_rejection())
                .to_string(),
            ClientError::Network(_) => kind.default_network_failure().to_string(),
        };
        Self {
            kind,
            message,
            cause,
        }
    }
}

/// Everything the controller needs from the server.
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Fetch the whole roster, bypassing any cache on the way.
    async fn fetch_roster(&self) -> Result<Roster, ClientError>;
    async fn enroll(&self, activity: &str, email: &str) -> Result<MutationOutcome, MutationFailure>;
    async fn unenroll(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MutationOutcome, MutationFailure>;
}

/// Validates `raw` as an http(s) base URL and strips trailing slashes so
/// endpoint paths can be appended directly.
pub fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|err| ClientError::network(format!("invalid server url '{trimmed}': {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(ClientError::network(format!(
            "invalid server url '{trimmed}': expected an http(s) base url"
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct HttpRosterClient {
    http: Client,
    server_url: String,
}

impl HttpRosterClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            server_url: normalize_base_url(server_url)?,
        })
    }

    async fn mutate(
        &self,
        kind: MutationKind,
        activity: &str,
        email: &str,
    ) -> Result<MutationOutcome, MutationFailure> {
        let url = format!("{}{}", self.server_url, signup_path(activity, email));
        debug!(operation = kind.as_str(), %activity, %email, "sending roster mutation");

        let request = match kind {
            MutationKind::Enroll => self.http.post(&url),
            MutationKind::Unenroll => self.http.delete(&url),
        };
        let response = request
            .header(CACHE_CONTROL, NO_STORE)
            .send()
            .await
            .map_err(|err| MutationFailure::new(kind, ClientError::network(err)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| MutationFailure::new(kind, ClientError::network(err)))?;

        if !status.is_success() {
            let detail = match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(body) => body.detail,
                // A failed unregister reads the same whether or not the body parses.
                Err(_) if kind == MutationKind::Unenroll => None,
                Err(err) => {
                    warn!(
                        operation = kind.as_str(),
                        %activity,
                        status = status.as_u16(),
                        %err,
                        "unreadable rejection body"
                    );
                    return Err(MutationFailure::new(kind, ClientError::network(err)));
                }
            };
            warn!(
                operation = kind.as_str(),
                %activity,
                status = status.as_u16(),
                ?detail,
                "roster mutation rejected"
            );
            return Err(MutationFailure::new(
                kind,
                ClientError::rejected(status.as_u16(), detail),
            ));
        }

        let message = match serde_json::from_slice::<MessageResponse>(&body) {
            Ok(body) => body.message,
            // An unregister that went through is still a success when the body is unreadable.
            Err(_) if kind == MutationKind::Unenroll => None,
            Err(err) => return Err(MutationFailure::new(kind, ClientError::network(err))),
        };

        Ok(MutationOutcome {
            kind,
            message: message.unwrap_or_else(|| kind.default_success(email)),
        })
    }
}

#[async_trait]
impl RosterApi for HttpRosterClient {
    async fn fetch_roster(&self) -> Result<Roster, ClientError> {
        let url = format!("{}{ACTIVITIES_PATH}", self.server_url);
        debug!(%url, "fetching roster");

        let response = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, NO_STORE)
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(ClientError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::network(format!(
                "unexpected status {status} from {ACTIVITIES_PATH}"
            )));
        }

        response.json::<Roster>().await.map_err(ClientError::network)
    }

    async fn enroll(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MutationOutcome, MutationFailure> {
        self.mutate(MutationKind::Enroll, activity, email).await
    }

    async fn unenroll(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MutationOutcome, MutationFailure> {
        self.mutate(MutationKind::Unenroll, activity, email).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

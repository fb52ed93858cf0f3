use thiserror::Error;

/// Failure taxonomy for every call the client makes against the roster server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport failure, or a response body that is not the expected shape.
    #[error("network error: {0}")]
    Network(String),
    /// Well-formed non-2xx response.
    #[error("request rejected with status {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        Self::Rejected { status, detail }
    }

    /// Server-supplied detail, only ever present on rejections.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Network(_) => None,
        }
    }
}

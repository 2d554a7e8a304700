use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Service { status: u16, message: String },
    #[error("unexpected response from backend: {0}")]
    Decode(String),
    #[error("invalid endpoint '{path}': {reason}")]
    InvalidEndpoint { path: String, reason: String },
    #[error("not signed in")]
    NotSignedIn,
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Service { status, .. } => Some(*status),
            GatewayError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

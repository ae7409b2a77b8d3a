use thiserror::Error;

pub const NOT_FOUND: &str = "Not Found";
pub const NODE_DISABLED: &str = "Node disabled";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("API cooldown, request skipped")]
    Skipped,
    #[error("Not Found")]
    NotFound,
    #[error("Node disabled")]
    NodeDisabled,
    #[error("{0}")]
    Api(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Response is not valid JSON")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<RequestError>,
    },
}

impl RequestError {
    /// Maps the `error` field of an API payload.
    pub fn from_api_message(message: &str) -> Self {
        match message {
            NOT_FOUND => RequestError::NotFound,
            NODE_DISABLED => RequestError::NodeDisabled,
            other => RequestError::Api(other.to_string()),
        }
    }

    /// Generic failures worth another attempt in wait mode.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RequestError::Api(_)
                | RequestError::Transport(_)
                | RequestError::InvalidResponse
                | RequestError::EmptyResponse
        )
    }
}

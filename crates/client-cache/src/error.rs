//! Client Errors
//!
//! Every failure is terminal for the user action that caused it; callers
//! roll back their optimistic change and surface a toast.

use thiserror::Error;

/// Common result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Request never produced a response (offline, CORS, aborted)
    #[error("Network error: {0}")]
    Network(String),
    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Target entity is not in a state that allows the action
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ClientError::Http { status, message: message.into() }
    }

    /// Status code when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ClientError::http(422, "The body field is required.");
        assert_eq!(err.to_string(), "HTTP 422: The body field is required.");
        assert_eq!(err.status(), Some(422));
        assert_eq!(ClientError::Network("offline".into()).status(), None);
    }
}

//! Error types for capnote.
//!
//! The first four variants are the pipeline taxonomy: every component maps
//! its failures onto one of them and the orchestrator turns them into logged
//! outcomes.

use thiserror::Error;

/// Result type alias using capnote's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for capnote operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Timeout, connection refused, DNS failure, TLS failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Remote service answered with a non-success status.
    #[error("Remote error: status {status}: {body}")]
    Remote { status: u16, body: String },

    /// Malformed HTML, JSON or other payload structure.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required field was absent or empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `Remote` error from a status code and response body.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Error::Remote {
            status,
            body: body.into(),
        }
    }

    /// Whether this error came from the transport rather than the remote service.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            Error::remote(status.as_u16(), e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_network() {
        let err = Error::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_error_display_remote() {
        let err = Error::remote(503, "maintenance");
        assert_eq!(err.to_string(), "Remote error: status 503: maintenance");
    }

    #[test]
    fn test_error_display_parse() {
        let err = Error::Parse("missing id".to_string());
        assert_eq!(err.to_string(), "Parse error: missing id");
    }

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation("empty title".to_string());
        assert_eq!(err.to_string(), "Validation error: empty title");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing token".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing token");
    }

    #[test]
    fn test_is_network() {
        assert!(Error::Network("timeout".to_string()).is_network());
        assert!(!Error::remote(500, "").is_network());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}

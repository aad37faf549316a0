//! Error types for the natter client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the natter crates.
///
/// Provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The taxonomy mirrors how
/// failures surface to the user: transport errors, non-success HTTP
/// statuses, and logical errors reported by the service in an otherwise
/// successful response.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum NatterError {
    /// Conversation not found on the service
    #[error("Conversation not found: '{id}'")]
    NotFound { id: String },

    /// Network-level failure (connect, timeout, broken stream)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The service answered with a non-success HTTP status
    #[error("Service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The service answered 2xx but reported a logical failure
    /// (`{"error": ...}` or `{"success": false}`)
    #[error("Service error: {0}")]
    Service(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NatterError {
    /// Creates a NotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a Service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this error was reported by the service itself rather than
    /// the transport or the client.
    pub fn is_service_reported(&self) -> bool {
        matches!(self, Self::Service(_) | Self::Status { .. })
    }
}

impl From<std::io::Error> for NatterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for NatterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NatterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for NatterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// A type alias for `Result<T, NatterError>`.
pub type Result<T> = std::result::Result<T, NatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_code() {
        let err = NatterError::status(502, "bad gateway");
        assert_eq!(err.to_string(), "Service returned HTTP 502: bad gateway");
    }

    #[test]
    fn service_errors_are_service_reported() {
        assert!(NatterError::service("nope").is_service_reported());
        assert!(NatterError::status(500, "boom").is_service_reported());
        assert!(!NatterError::transport("refused").is_service_reported());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: NatterError = io.into();
        assert!(matches!(err, NatterError::Io { .. }));
    }
}

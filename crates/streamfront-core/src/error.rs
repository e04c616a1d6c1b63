//! Error types for the Streamfront client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;

/// A shared error type for the entire Streamfront client.
///
/// Typed, structured variants with automatic conversion from the error types
/// the adapters run into.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StreamfrontError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Persisted storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote API call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// An operation that needs a signed-in user ran without one
    #[error("No active session")]
    NoSession,

    /// Input rejected before it reached the remote API
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StreamfrontError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the input was rejected locally
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this error came back from the remote API
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Check if this is a missing-session error
    pub fn is_no_session(&self) -> bool {
        matches!(self, Self::NoSession)
    }

    /// Returns a message suitable for showing to the user.
    ///
    /// Remote failures use the server's message when one was sent, everything
    /// else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err.message_or(fallback),
            Self::Validation(message) => message.clone(),
            Self::NoSession => "Please sign in to continue.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StreamfrontError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StreamfrontError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StreamfrontError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StreamfrontError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StreamfrontError>`.
pub type Result<T> = std::result::Result<T, StreamfrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_remote_message() {
        let err = StreamfrontError::from(ApiError::Rejected {
            status: 400,
            message: Some("Email already registered".to_string()),
        });
        assert_eq!(err.user_message("Registration failed"), "Email already registered");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = StreamfrontError::storage("disk full");
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StreamfrontError = io.into();
        assert!(matches!(err, StreamfrontError::Io { .. }));
        assert!(err.to_string().contains("gone"));
    }
}

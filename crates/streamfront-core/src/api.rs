//! Shared shapes of the remote API contract.
//!
//! Every remote endpoint either answers with a typed body or fails with an
//! [`ApiError`]. Non-2xx responses may carry a `{message}` body which is shown
//! to the user verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic `{message}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// A file sent as one part of a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Name reported to the server; the content type is guessed from it.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Failure of a single remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("request rejected with status {status}{}", display_message(.message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The server answered 401; the credential is missing, expired or revoked.
    #[error("unauthorized{}", display_message(.message))]
    Unauthorized { message: Option<String> },

    /// No response arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never completed (connection refused, DNS, TLS, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request was refused client-side before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered but the result could not be saved locally.
    #[error("could not persist result: {0}")]
    Persistence(String),
}

fn display_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.trim().is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

impl ApiError {
    /// Message supplied by the remote side, if it sent a non-empty one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::Unauthorized { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Human-readable message: the remote one when present, otherwise `fallback`.
    ///
    /// Never returns an empty string as long as `fallback` is non-empty.
    pub fn message_or(&self, fallback: &str) -> String {
        if let Some(message) = self.remote_message() {
            return message.to_string();
        }
        match self {
            Self::Timeout => "The server took too long to respond. Please try again.".to_string(),
            Self::InvalidRequest(reason) if !reason.is_empty() => reason.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_is_used_verbatim() {
        let err = ApiError::Rejected {
            status: 400,
            message: Some("Invalid email or password".to_string()),
        };
        assert_eq!(err.message_or("Login failed"), "Invalid email or password");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_blank_remote_message_falls_back() {
        let err = ApiError::Unauthorized {
            message: Some("   ".to_string()),
        };
        assert!(err.remote_message().is_none());
        assert_eq!(err.message_or("Login failed"), "Login failed");
    }

    #[test]
    fn test_transport_failure_uses_fallback() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.message_or("Registration failed"), "Registration failed");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_display_includes_message() {
        let err = ApiError::Rejected {
            status: 409,
            message: Some("taken".to_string()),
        };
        assert_eq!(err.to_string(), "request rejected with status 409: taken");
    }
}

//! Error types for the session/auth capability.

use thiserror::Error;

/// Errors that can occur while talking to the session/auth API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The server answered with an error document.
    #[error("{error}: {reason} (status {status})")]
    Remote {
        status: u16,
        error: String,
        reason: String,
    },

    /// The request failed before any server verdict was obtained.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered, but the payload could not be interpreted.
    #[error("Invalid response from auth API: {0}")]
    InvalidResponse(String),

    /// The configured base location is not a valid URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The caller handed the API an unusable request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AuthError {
    /// Check if this error carries a server verdict.
    pub fn is_remote_error(&self) -> bool {
        matches!(self, AuthError::Remote { .. })
    }

    /// Check if this is a network-level error (no server verdict).
    pub fn is_network_error(&self) -> bool {
        matches!(self, AuthError::Http(_))
    }

    /// Check if the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Remote { status: 401, .. })
    }
}

//! Error types for the document store capability.

use thiserror::Error;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The server answered with an error document.
    ///
    /// Carries the HTTP status plus CouchDB's `{error, reason}` pair.
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
    #[error("Invalid response from document store: {0}")]
    InvalidResponse(String),

    /// The configured base location is not a valid URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The document passed in lacks a field the operation needs.
    #[error("Document is missing the {0} field")]
    MissingField(&'static str),
}

impl StoreError {
    /// Check if this error indicates the document was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Remote { status: 404, .. })
            || matches!(self, StoreError::Remote { error, .. } if error == "not_found")
    }

    /// Check if this error indicates a revision conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Remote { status: 409, .. })
            || matches!(self, StoreError::Remote { error, .. } if error == "conflict")
    }

    /// Check if the server reported the document as already deleted.
    pub fn is_already_deleted(&self) -> bool {
        matches!(self, StoreError::Remote { error, .. } if error == "deleted")
    }

    /// Check if this is a network-level error (no server verdict).
    pub fn is_network_error(&self) -> bool {
        matches!(self, StoreError::Http(_))
    }
}

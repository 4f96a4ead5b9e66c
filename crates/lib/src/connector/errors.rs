//! Error types for the connector.

use thiserror::Error;

/// Errors raised by the connector itself, before the store is involved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectorError {
    /// The document carries no identifier, so it cannot be fetched.
    ///
    /// This is a usage error: it is returned before any network call is
    /// attempted, since it indicates programmer misuse rather than a
    /// transport or server failure.
    #[error("The document has no _id attribute, so it cannot be fetched from the database")]
    MissingDocumentId,
}

impl ConnectorError {
    /// Check if this error indicates programmer misuse.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ConnectorError::MissingDocumentId)
    }
}

//! Error types for the user model.

use thiserror::Error;

use super::types::ValidationErrors;

/// Session check failures.
///
/// These are domain errors with descriptive messages; they are delivered as
/// both an `error:session` event and the operation's `Err` arm, computed
/// from one outcome.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The server reported no authenticated user.
    #[error("The user has no session")]
    NoSession,

    /// The server's authenticated user differs from the loaded model's.
    #[error(
        "The session's user name '{session_user_name}' does not match the loaded model's user name '{model_user_name}'"
    )]
    Mismatch {
        session_user_name: String,
        model_user_name: String,
    },
}

/// Errors raised by user model operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserError {
    /// Session check failure (no session, or user name mismatch).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Signup field validation failed; no external call was made.
    #[error("Signup validation failed: {0}")]
    Validation(ValidationErrors),

    /// The model has no recorded user name, so the account document
    /// identifier cannot be derived. Usage error, returned before any
    /// network call.
    #[error("The model has no user_name attribute, so its account document cannot be loaded")]
    MissingUserName,

    /// An attribute required by the operation is absent.
    #[error("The model is missing the {attribute} attribute required for {operation}")]
    MissingAttribute {
        attribute: &'static str,
        operation: &'static str,
    },
}

impl UserError {
    /// Check if this error indicates programmer misuse.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            UserError::MissingUserName | UserError::MissingAttribute { .. }
        )
    }

    /// Check if this error carries signup validation failures.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, UserError::Validation(_))
    }

    /// Check if this error came from a session check.
    pub fn is_session_error(&self) -> bool {
        matches!(self, UserError::Session(_))
    }
}

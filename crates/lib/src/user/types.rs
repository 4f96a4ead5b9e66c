//! Event and validation types for the user model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::SessionError;

/// Validation failure kind: the password attribute was absent or empty.
pub const PASSWORD_EMPTY: &str = "password_empty";
/// Validation failure kind: the confirmation did not match the password.
pub const PASSWORD_CONFIRM: &str = "password_confirm";
/// Validation failure kind: the name attribute was absent or empty.
pub const NAME_MISSING: &str = "name";

/// Signup validation failures, as a mapping from failure kind to a
/// human-readable message.
///
/// All failures are accumulated, not just the first one encountered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// Record a failure.
    pub(crate) fn insert(&mut self, kind: &str, message: &str) {
        self.0.insert(kind.to_string(), message.to_string());
    }

    /// Look up the message for a failure kind.
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0.get(kind).map(String::as_str)
    }

    /// Check whether a failure kind was recorded.
    pub fn contains(&self, kind: &str) -> bool {
        self.0.contains_key(kind)
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether any failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(kind, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{kind}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Events emitted by the user model.
///
/// Event emission and the operation's returned `Result` are two projections
/// of one internal outcome and are dispatched together; subscribers and
/// callers always observe the same verdict.
#[derive(Clone, Debug)]
pub enum UserEvent {
    /// An attribute changed value.
    Changed { attribute: String },
    /// Signup succeeded.
    Registered,
    /// Signup failed. Validation failures carry the accumulated mapping; a
    /// remote failure carries an empty one (the server's error detail is
    /// only available on the operation's `Err` arm).
    RegistrationFailed { errors: ValidationErrors },
    /// Session check succeeded.
    Session,
    /// Session check failed.
    SessionFailed { error: SessionError },
    /// Login succeeded.
    LoggedIn,
    /// Login failed.
    LoginFailed,
    /// Logout succeeded.
    LoggedOut,
    /// Logout failed (local attributes stay cleared regardless).
    LogoutFailed,
    /// The account document was fetched and merged into the model.
    FilledWithDataFromServer,
    /// Emitted by `ensure_filled_with_data` after a successful fill.
    FilledWithData,
    /// Password change (save + re-login) succeeded.
    PasswordChanged,
    /// Password change failed at either step.
    PasswordChangeFailed,
}

impl UserEvent {
    /// The event's wire name, the observable contract downstream code keys on.
    pub fn name(&self) -> &'static str {
        match self {
            UserEvent::Changed { .. } => "change",
            UserEvent::Registered => "registered",
            UserEvent::RegistrationFailed { .. } => "error:registered",
            UserEvent::Session => "session",
            UserEvent::SessionFailed { .. } => "error:session",
            UserEvent::LoggedIn => "loggedin",
            UserEvent::LoginFailed => "error:loggedin",
            UserEvent::LoggedOut => "loggedout",
            UserEvent::LogoutFailed => "error:loggedout",
            UserEvent::FilledWithDataFromServer => "filledwithdatafromserver",
            UserEvent::FilledWithData => "filledwithdata",
            UserEvent::PasswordChanged => "password-changed",
            UserEvent::PasswordChangeFailed => "error:password-changed",
        }
    }
}

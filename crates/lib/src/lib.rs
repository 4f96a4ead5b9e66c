//!
//! Couchbind: model-style account bindings for CouchDB's HTTP API.
//! This library binds an event-emitting account model to a document
//! database, so account documents can be read and written through a
//! model-style interface and the account lifecycle (signup, login, session
//! check, logout, password change) can be driven from the client.
//!
//! ## Core Concepts
//!
//! * **Document store (`store::DocumentStore`)**: the capability trait for the
//!   backing document database (open-by-id, save, remove). `store::CouchStore`
//!   is the bundled HTTP implementation.
//! * **Auth API (`auth::AuthApi`)**: the capability trait for the server's
//!   session and account endpoints (session, signup, login, logout), with
//!   `auth::CouchAuth` as the bundled HTTP implementation.
//! * **Connector (`connector::Connector`)**: stateless translation of the four
//!   CRUD verbs onto document store operations for one collection. Explicitly
//!   constructed and injected; nothing is configured through globals.
//! * **User model (`user::UserModel`)**: owns one account document's
//!   attributes and drives the account lifecycle, emitting named
//!   `user::UserEvent`s. Event emission and each operation's returned
//!   `Result` are projections of one internal outcome, dispatched together.

pub mod auth;
pub mod connector;
pub mod constants;
pub mod store;
pub mod user;

/// Re-export the `UserModel` struct for easier access.
pub use user::UserModel;

/// Result type used throughout the couchbind library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the couchbind library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured document store errors from the store module
    #[error(transparent)]
    Store(#[from] store::StoreError),

    /// Structured session/auth errors from the auth module
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    /// Structured connector errors from the connector module
    #[error(transparent)]
    Connector(#[from] connector::ConnectorError),

    /// Structured user model errors from the user module
    #[error(transparent)]
    User(#[from] user::UserError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Store(_) => "store",
            Error::Auth(_) => "auth",
            Error::Connector(_) => "connector",
            Error::User(_) => "user",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates programmer misuse (an operation issued
    /// without a required identifier or attribute).
    pub fn is_usage_error(&self) -> bool {
        match self {
            Error::Connector(connector_err) => connector_err.is_usage_error(),
            Error::User(user_err) => user_err.is_usage_error(),
            _ => false,
        }
    }

    /// Check if this error carries signup validation failures.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error came from a session check.
    pub fn is_session_error(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_session_error(),
            _ => false,
        }
    }

    /// Check if this error means the server reported no authenticated user.
    pub fn is_no_session(&self) -> bool {
        matches!(
            self,
            Error::User(user::UserError::Session(user::SessionError::NoSession))
        )
    }

    /// Check if this error means the session's user differs from the model's.
    pub fn is_session_mismatch(&self) -> bool {
        matches!(
            self,
            Error::User(user::UserError::Session(
                user::SessionError::Mismatch { .. }
            ))
        )
    }

    /// Check if this error indicates a document was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a revision conflict.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is a network-level failure (no server verdict).
    pub fn is_network_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_network_error(),
            Error::Auth(auth_err) => auth_err.is_network_error(),
            _ => false,
        }
    }

    /// Check if this error carries a server verdict (the remote
    /// `{status, error, reason}` triple).
    pub fn is_remote_error(&self) -> bool {
        matches!(
            self,
            Error::Store(store::StoreError::Remote { .. })
                | Error::Auth(auth::AuthError::Remote { .. })
        )
    }
}

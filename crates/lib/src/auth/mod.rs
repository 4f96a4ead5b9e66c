//! Session/auth capability.
//!
//! Defines the capability trait for the server's session and account API
//! (current session, signup, login, logout) and payload types. The user
//! model consumes this trait; the bundled [`CouchAuth`] implementation
//! speaks CouchDB's `_session` and `_users` endpoints.

pub mod couch;
pub mod errors;
pub mod types;

pub use couch::CouchAuth;
pub use errors::AuthError;
pub use types::{SessionInfo, UserCtx};

use async_trait::async_trait;
use serde_json::Value;

/// Capability set of the session/auth API.
///
/// Each call produces exactly one terminal outcome; there are no retries and
/// no cancellation.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Query the server for the current session.
    ///
    /// An anonymous caller is a successful query with an empty user context,
    /// not an error.
    async fn session(&self) -> Result<SessionInfo, AuthError>;

    /// Register a new account.
    ///
    /// `attributes` is the cleaned account document (no password fields);
    /// the password travels separately and never becomes a document field on
    /// the client side.
    async fn signup(&self, attributes: &Value, password: &str) -> Result<(), AuthError>;

    /// Authenticate with name and password.
    async fn login(&self, name: &str, password: &str) -> Result<(), AuthError>;

    /// End the current session.
    async fn logout(&self) -> Result<(), AuthError>;
}

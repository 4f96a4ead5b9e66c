//! Payload types for the session/auth capability.

use serde::{Deserialize, Serialize};

/// Server response to a session query.
///
/// An anonymous caller yields an empty user context rather than an error;
/// deciding what "no session" means is left to the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    /// The server's current authenticated-user claim.
    #[serde(rename = "userCtx", default)]
    pub user_ctx: UserCtx,
}

/// The authenticated-user claim inside a session response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserCtx {
    /// Account name, or `None` for an anonymous session.
    #[serde(default)]
    pub name: Option<String>,

    /// Roles granted to the account.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl SessionInfo {
    /// The authenticated account name, if any.
    ///
    /// An empty name is treated the same as an absent one.
    pub fn user_name(&self) -> Option<&str> {
        self.user_ctx
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

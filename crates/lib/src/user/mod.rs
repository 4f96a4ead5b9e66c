//! The user account model.
//!
//! [`UserModel`] owns one account document's attributes and drives the
//! account lifecycle: signup, login, session check, logout, password change
//! and loading the account document from the server. Persistence of the
//! document itself is routed through an injected [`Connector`]; the session
//! and account API is an injected [`AuthApi`] capability.
//!
//! Every operation computes a single internal outcome and dispatches both of
//! its projections together: a named [`UserEvent`] for subscribers and the
//! `Result` returned to the caller. The two can never disagree.

pub mod errors;
pub mod events;
pub mod types;

pub use errors::{SessionError, UserError};
pub use types::{NAME_MISSING, PASSWORD_CONFIRM, PASSWORD_EMPTY, UserEvent, ValidationErrors};

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::broadcast;

use crate::Result;
use crate::auth::AuthApi;
use crate::connector::Connector;
use crate::constants::account_doc_id;
use crate::store::{SavedRevision, StoreError};
use events::EventBus;

/// Attribute key holding the server-confirmed account name.
///
/// Distinct from the `name` attribute the caller sets before signup or
/// login: `user_name` is only ever adopted from a session check or a fetched
/// account document.
pub const USER_NAME_ATTR: &str = "user_name";

/// An event-emitting account model bound to the document database.
///
/// The in-memory attribute set is a cache of server state, not a source of
/// truth. Operations take `&mut self`, so two operations on one model cannot
/// overlap in flight.
pub struct UserModel {
    attributes: Map<String, Value>,
    connector: Connector,
    auth: Arc<dyn AuthApi>,
    events: EventBus,
}

impl UserModel {
    /// Create an empty model over the given connector and auth API.
    pub fn new(connector: Connector, auth: Arc<dyn AuthApi>) -> Self {
        Self {
            attributes: Map::new(),
            connector,
            auth,
            events: EventBus::new(),
        }
    }

    // === Attributes ===

    /// Get an attribute value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get a string attribute value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Set an attribute, emitting a change event if the value differs.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if self.attributes.get(&key) == Some(&value) {
            return;
        }
        self.attributes.insert(key.clone(), value);
        self.events.emit(UserEvent::Changed { attribute: key });
    }

    /// Set an attribute without emitting a change event.
    pub fn set_silent(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove all attributes without emitting change events.
    pub fn clear_silent(&mut self) {
        self.attributes.clear();
    }

    /// Serialize the current attributes to a plain JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }

    /// Check whether the model holds any attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Listen for model events.
    pub fn subscribe(&self) -> broadcast::Receiver<UserEvent> {
        self.events.subscribe()
    }

    // === Persistence dispatch ===

    /// Fetch the document named by the model's `_id` and merge it in.
    ///
    /// Merging emits normal change events per modified attribute.
    pub async fn fetch(&mut self) -> Result<()> {
        let doc = self.connector.read(&self.to_json()).await?;
        self.merge(doc)?;
        Ok(())
    }

    /// Persist the current attributes.
    ///
    /// Dispatches to create or update depending on whether a revision is
    /// recorded; both are the same store operation. The returned identifier
    /// and revision are adopted into the attributes.
    pub async fn save(&mut self) -> Result<SavedRevision> {
        let doc = self.to_json();
        let saved = if self.get_str("_rev").is_some() {
            self.connector.update(&doc).await?
        } else {
            self.connector.create(&doc).await?
        };
        self.set("_id", saved.id.clone());
        self.set("_rev", saved.rev.clone());
        Ok(saved)
    }

    /// Delete the account document from the store.
    pub async fn destroy(&mut self) -> Result<()> {
        self.connector.delete(&self.to_json()).await
    }

    // === Account operations ===

    /// Register a new account from the current attributes.
    ///
    /// The `password` and `password_confirm` attributes are read and removed
    /// from the outgoing attribute set before anything is sent; they never
    /// become document fields. Validation failures are accumulated into a
    /// mapping and delivered via `error:registered` without the auth API
    /// ever being called.
    pub async fn signup(&mut self) -> Result<()> {
        let mut user_data = self.attributes.clone();
        let password = take_string(&mut user_data, "password");
        let password_confirm = take_string(&mut user_data, "password_confirm");

        let mut errors = ValidationErrors::default();
        if password.is_empty() {
            errors.insert(PASSWORD_EMPTY, "A password is required");
        }
        if password_confirm.is_empty() || password_confirm != password {
            errors.insert(PASSWORD_CONFIRM, "Passwords do not match");
        }
        if user_data
            .get("name")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
        {
            errors.insert(NAME_MISSING, "Name is required");
        }

        if !errors.is_empty() {
            tracing::debug!(failures = errors.len(), "signup validation failed");
            self.events.emit(UserEvent::RegistrationFailed {
                errors: errors.clone(),
            });
            return Err(UserError::Validation(errors).into());
        }

        match self
            .auth
            .signup(&Value::Object(user_data), &password)
            .await
        {
            Ok(()) => {
                self.events.emit(UserEvent::Registered);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "signup rejected by server");
                self.events.emit(UserEvent::RegistrationFailed {
                    errors: ValidationErrors::default(),
                });
                Err(err.into())
            }
        }
    }

    /// Check the server's current session against the model.
    ///
    /// With no authenticated user this fails with
    /// [`SessionError::NoSession`]. An authenticated name is adopted into
    /// the `user_name` attribute when the model has none yet (first-session
    /// binding); a differing recorded name fails with
    /// [`SessionError::Mismatch`] naming both sides.
    pub async fn session(&mut self) -> Result<()> {
        let info = self.auth.session().await?;

        let outcome = match info.user_name().map(str::to_owned) {
            None => Err(SessionError::NoSession),
            Some(session_user_name) => {
                match self.get_str(USER_NAME_ATTR).map(str::to_owned) {
                    None => {
                        tracing::debug!(user_name = %session_user_name, "adopting session user");
                        self.set(USER_NAME_ATTR, session_user_name);
                        Ok(())
                    }
                    Some(model_user_name) if model_user_name != session_user_name => {
                        Err(SessionError::Mismatch {
                            session_user_name,
                            model_user_name,
                        })
                    }
                    Some(_) => Ok(()),
                }
            }
        };

        match outcome {
            Ok(()) => {
                self.events.emit(UserEvent::Session);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "session check failed");
                self.events.emit(UserEvent::SessionFailed {
                    error: error.clone(),
                });
                Err(UserError::from(error).into())
            }
        }
    }

    /// Authenticate with the `name` and `password` attributes.
    pub async fn login(&mut self) -> Result<()> {
        let name = self
            .get_str("name")
            .map(str::to_owned)
            .ok_or(UserError::MissingAttribute {
                attribute: "name",
                operation: "login",
            })?;
        let password = self.get_str("password").unwrap_or_default().to_owned();

        match self.auth.login(&name, &password).await {
            Ok(()) => {
                self.events.emit(UserEvent::LoggedIn);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(name = %name, error = %err, "login failed");
                self.events.emit(UserEvent::LoginFailed);
                Err(err.into())
            }
        }
    }

    /// End the session.
    ///
    /// Local attributes are cleared silently and unconditionally before the
    /// remote call: the model is logged out optimistically, and a failing
    /// server logout does not restore them.
    pub async fn logout(&mut self) -> Result<()> {
        self.clear_silent();

        match self.auth.logout().await {
            Ok(()) => {
                self.events.emit(UserEvent::LoggedOut);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "server logout failed");
                self.events.emit(UserEvent::LogoutFailed);
                Err(err.into())
            }
        }
    }

    /// Load the account document for the recorded `user_name` and merge it
    /// into the model.
    ///
    /// The identifier is derived from the `user_name` attribute, not the
    /// model's own `_id`. A missing `user_name` is a usage error, returned
    /// before any network call.
    pub async fn fill_with_data(&mut self) -> Result<()> {
        let user_name = self
            .get_str(USER_NAME_ATTR)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .ok_or(UserError::MissingUserName)?;

        let doc_id = account_doc_id(&user_name);
        let doc = self.connector.store().open_doc(&doc_id).await?;
        self.merge(doc)?;
        self.events.emit(UserEvent::FilledWithDataFromServer);
        Ok(())
    }

    /// Load the account document, then signal that data is present.
    ///
    /// Unconditionally delegates to [`UserModel::fill_with_data`] and
    /// additionally emits `filledwithdata` on success.
    pub async fn ensure_filled_with_data(&mut self) -> Result<()> {
        self.fill_with_data().await?;
        self.events.emit(UserEvent::FilledWithData);
        Ok(())
    }

    /// Change the account password.
    ///
    /// Persists the new password via save, and only after the save completes
    /// re-authenticates with the new credentials. The combined chain's
    /// outcome is reported as one event; a failed save never attempts the
    /// login.
    pub async fn change_password(&mut self, new_password: &str) -> Result<()> {
        self.set("password", new_password);

        let chain = match self.save().await {
            Ok(_) => self.login().await,
            Err(err) => Err(err),
        };

        match chain {
            Ok(()) => {
                self.events.emit(UserEvent::PasswordChanged);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "password change failed");
                self.events.emit(UserEvent::PasswordChangeFailed);
                Err(err)
            }
        }
    }

    /// Merge a fetched document into the attributes with normal change
    /// notifications.
    fn merge(&mut self, doc: Value) -> Result<()> {
        let object = match doc {
            Value::Object(object) => object,
            other => {
                return Err(StoreError::InvalidResponse(format!(
                    "expected a document object, got {other}"
                ))
                .into());
            }
        };
        for (key, value) in object {
            self.set(key, value);
        }
        Ok(())
    }
}

/// Remove a key from an attribute set, yielding its string value.
///
/// Missing keys and non-string values both yield the empty string, which the
/// validation rules treat the same as an explicitly empty attribute.
fn take_string(attributes: &mut Map<String, Value>, key: &str) -> String {
    match attributes.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

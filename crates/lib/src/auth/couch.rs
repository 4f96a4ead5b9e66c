//! HTTP session/auth implementation.
//!
//! Reqwest-backed [`AuthApi`] implementation for CouchDB: session queries
//! and login/logout against `_session`, signup as an account document write
//! into `_users`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use super::{AuthApi, AuthError, SessionInfo};
use crate::constants::{DEFAULT_BASE_URL, USERS_DB, account_doc_id};

/// HTTP client for the server's session and account endpoints.
#[derive(Clone, Debug)]
pub struct CouchAuth {
    client: reqwest::Client,
    base_url: String,
}

impl CouchAuth {
    /// Create an auth client against the default base location.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base location of the server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, AuthError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| AuthError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    fn session_url(&self) -> String {
        format!("{}/_session", self.base_url)
    }

    fn signup_url(&self, doc_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, USERS_DB, doc_id)
    }
}

impl Default for CouchAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthApi for CouchAuth {
    async fn session(&self) -> Result<SessionInfo, AuthError> {
        tracing::debug!("querying current session");
        let response = self
            .client
            .get(self.session_url())
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;
        let body = decode_json(response).await?;
        serde_json::from_value(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }

    async fn signup(&self, attributes: &Value, password: &str) -> Result<(), AuthError> {
        let doc = signup_doc(attributes, password)?;
        let doc_id = doc
            .get("_id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default();
        tracing::debug!(%doc_id, "signing up new account");

        let response = self
            .client
            .put(self.signup_url(&doc_id))
            .json(&doc)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;
        decode_json(response).await.map(|_| ())
    }

    async fn login(&self, name: &str, password: &str) -> Result<(), AuthError> {
        tracing::debug!(name, "logging in");
        let response = self
            .client
            .post(self.session_url())
            .json(&json!({ "name": name, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;
        decode_json(response).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        tracing::debug!("logging out");
        let response = self
            .client
            .delete(self.session_url())
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;
        decode_json(response).await.map(|_| ())
    }
}

/// Build the `_users` account document for a signup call.
///
/// The identifier is derived from the name attribute; `type` and `roles` are
/// filled in when absent. The password becomes the server-consumed
/// `password` field of this one request only.
fn signup_doc(attributes: &Value, password: &str) -> Result<Value, AuthError> {
    let mut doc = attributes
        .as_object()
        .cloned()
        .ok_or_else(|| AuthError::InvalidRequest("signup attributes must be an object".into()))?;

    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AuthError::InvalidRequest("signup attributes are missing a name".into()))?;

    doc.insert("_id".to_string(), Value::String(account_doc_id(name)));
    doc.entry("type").or_insert_with(|| json!("user"));
    doc.entry("roles").or_insert_with(|| json!([]));
    doc.insert("password".to_string(), Value::String(password.to_string()));

    Ok(Value::Object(doc))
}

/// CouchDB error response body: `{"error": ..., "reason": ...}`.
#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

async fn decode_json(response: reqwest::Response) -> Result<Value, AuthError> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    } else {
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(AuthError::Remote {
            status: status.as_u16(),
            error: body.error.unwrap_or_else(|| "unknown".to_string()),
            reason: body.reason.unwrap_or_default(),
        })
    }
}

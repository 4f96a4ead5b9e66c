//! HTTP document store implementation.
//!
//! This module provides the reqwest-backed [`DocumentStore`] implementation
//! speaking CouchDB's REST API against a single configured database.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{DocumentStore, SavedRevision, StoreError};
use crate::constants::{DEFAULT_BASE_URL, USERS_DB};

/// HTTP client for one CouchDB database.
///
/// Configuration is plain constructor input: the database name and an
/// optional base location override. There is no shared global configuration.
#[derive(Clone, Debug)]
pub struct CouchStore {
    client: reqwest::Client,
    base_url: String,
    db_name: String,
}

impl CouchStore {
    /// Create a store for the given database on the default base location.
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            db_name: db_name.into(),
        }
    }

    /// Create a store for the `_users` database.
    pub fn users() -> Self {
        Self::new(USERS_DB)
    }

    /// Override the base location of the server.
    ///
    /// The value is validated as a URL; a trailing slash is stripped so that
    /// request paths can be appended uniformly.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, StoreError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| StoreError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Name of the database this store is bound to.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    fn db_url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.db_name, id)
    }
}

#[async_trait]
impl DocumentStore for CouchStore {
    async fn open_doc(&self, id: &str) -> Result<Value, StoreError> {
        tracing::debug!(db = %self.db_name, id, "opening document");
        let response = self
            .client
            .get(self.doc_url(id))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        decode_json(response).await
    }

    async fn save_doc(&self, doc: &Value) -> Result<SavedRevision, StoreError> {
        let id = doc
            .get("_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty());
        tracing::debug!(db = %self.db_name, id = id.unwrap_or("<new>"), "saving document");

        // PUT to the document URL when the id is known, POST to the database
        // otherwise and let the server assign one.
        let request = match id {
            Some(id) => self.client.put(self.doc_url(id)),
            None => self.client.post(self.db_url()),
        };
        let response = request
            .json(doc)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        let body = decode_json(response).await?;
        let saved: SaveResponse = serde_json::from_value(body)
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(SavedRevision {
            id: saved.id,
            rev: saved.rev,
        })
    }

    async fn remove_doc(&self, doc: &Value) -> Result<(), StoreError> {
        let id = doc
            .get("_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(StoreError::MissingField("_id"))?;
        tracing::debug!(db = %self.db_name, id, "removing document");

        let mut request = self.client.delete(self.doc_url(id));
        if let Some(rev) = doc.get("_rev").and_then(Value::as_str) {
            request = request.query(&[("rev", rev)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        decode_json(response).await.map(|_| ())
    }
}

/// Successful save response body: `{"ok": true, "id": ..., "rev": ...}`.
#[derive(Deserialize)]
struct SaveResponse {
    id: String,
    rev: String,
}

/// CouchDB error response body: `{"error": ..., "reason": ...}`.
#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Decode a response into its JSON body, turning non-success statuses into
/// the remote `{status, error, reason}` triple.
async fn decode_json(response: reqwest::Response) -> Result<Value, StoreError> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    } else {
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(StoreError::Remote {
            status: status.as_u16(),
            error: body.error.unwrap_or_else(|| "unknown".to_string()),
            reason: body.reason.unwrap_or_default(),
        })
    }
}

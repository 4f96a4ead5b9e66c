//! CRUD verb translation onto the document store.
//!
//! The connector maps the four generic persistence verbs (read, create,
//! update, delete) onto the store's native operations (open, save, remove)
//! for one collection. It is an explicitly constructed, injectable service:
//! every [`crate::user::UserModel`] receives its own connector at
//! construction, and no configuration is shared through globals.
//!
//! Each operation is a single `async fn` returning a `Result`; awaiting the
//! returned future is the unconditional completion signal, and success and
//! failure are the two arms of the result. There are no callback parameters.

pub mod errors;

pub use errors::ConnectorError;

use std::sync::Arc;

use serde_json::Value;

use crate::Result;
use crate::store::{DocumentStore, SavedRevision};

/// Stateless translation of CRUD verbs into document store operations.
#[derive(Clone)]
pub struct Connector {
    store: Arc<dyn DocumentStore>,
}

impl Connector {
    /// Create a connector over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The store this connector delegates to.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Fetch the document named by `doc`'s `_id` attribute.
    ///
    /// A missing or empty `_id` is a usage error, returned before any
    /// network call is attempted.
    pub async fn read(&self, doc: &Value) -> Result<Value> {
        let id = doc
            .get("_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(ConnectorError::MissingDocumentId)?;

        Ok(self.store.open_doc(id).await?)
    }

    /// Store the document's current attributes.
    ///
    /// Yields the stored identifier and new revision, not the full document.
    pub async fn create(&self, doc: &Value) -> Result<SavedRevision> {
        Ok(self.store.save_doc(doc).await?)
    }

    /// Identical to [`Connector::create`]: the store's save is idempotent
    /// over identifier + revision. The caller carries the current `_rev` to
    /// avoid conflicting writes.
    pub async fn update(&self, doc: &Value) -> Result<SavedRevision> {
        self.create(doc).await
    }

    /// Remove the document.
    ///
    /// A server response meaning "already deleted" is success, so deleting
    /// an already-gone document is idempotent. All other failures propagate.
    pub async fn delete(&self, doc: &Value) -> Result<()> {
        match self.store.remove_doc(doc).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_already_deleted() => {
                tracing::debug!("document already deleted, treating as success");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

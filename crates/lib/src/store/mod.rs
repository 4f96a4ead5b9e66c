//! Document store capability.
//!
//! This module defines the capability trait the rest of the library uses to
//! reach the document database, allowing the connector and the user model to
//! work against any store implementation (the bundled HTTP client, or a stub
//! in tests).

pub mod couch;
pub mod errors;

pub use couch::CouchStore;
pub use errors::StoreError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier and revision returned after a successful save.
///
/// The store does not echo the full document back; callers that need the
/// stored state adopt the new identifier and revision into their own copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRevision {
    /// Document identifier.
    pub id: String,
    /// Revision assigned by the store for this write.
    pub rev: String,
}

/// Capability set of the document database: open-by-id, save, remove.
///
/// Every method produces exactly one terminal outcome; there are no retries
/// and no cancellation. Server-side failures surface as
/// [`StoreError::Remote`] triples.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by identifier.
    ///
    /// # Returns
    /// The raw document payload on success.
    async fn open_doc(&self, id: &str) -> Result<Value, StoreError>;

    /// Store a document, creating it or overwriting the revision it names.
    ///
    /// The write is idempotent over identifier + revision: the caller carries
    /// the current `_rev` to avoid conflicting writes, and a stale revision
    /// surfaces as a conflict error from the server.
    ///
    /// # Returns
    /// The stored identifier and the newly assigned revision.
    async fn save_doc(&self, doc: &Value) -> Result<SavedRevision, StoreError>;

    /// Remove a document.
    ///
    /// The document must carry its `_id`; the current `_rev` is forwarded
    /// when present so the server can check the deletion against the latest
    /// revision.
    async fn remove_doc(&self, doc: &Value) -> Result<(), StoreError>;
}

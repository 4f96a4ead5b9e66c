//! Constants used throughout the couchbind library.
//!
//! This module provides central definitions for the account document
//! namespace and the default server location.

/// Namespace prefix for account document identifiers.
///
/// CouchDB stores user documents under `org.couchdb.user:{name}`; the
/// identifier of an account document is always derived from the account
/// name with this prefix.
pub const ACCOUNT_ID_PREFIX: &str = "org.couchdb.user:";

/// Default database holding account documents.
pub const USERS_DB: &str = "_users";

/// Default base location of the CouchDB server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5984";

/// Derive the account document identifier for an account name.
pub fn account_doc_id(name: &str) -> String {
    format!("{ACCOUNT_ID_PREFIX}{name}")
}

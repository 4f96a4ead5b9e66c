//! Tests for CRUD verb translation onto the document store.

use std::sync::Arc;

use serde_json::json;

use couchbind::connector::Connector;
use couchbind::store::{SavedRevision, StoreError};

use crate::helpers::{RecordingStore, logged_calls, new_call_log};

fn connector() -> (Connector, Arc<RecordingStore>, crate::helpers::CallLog) {
    let log = new_call_log();
    let store = Arc::new(RecordingStore::new(log.clone()));
    (Connector::new(store.clone()), store, log)
}

#[tokio::test]
async fn test_read_without_id_fails_without_network() {
    let (con, _store, log) = connector();

    let err = con
        .read(&json!({ "name": "alice", "type": "user" }))
        .await
        .unwrap_err();

    assert!(err.is_usage_error());
    assert_eq!(err.module(), "connector");
    assert!(
        logged_calls(&log).is_empty(),
        "a missing id must fail before any store operation"
    );
}

#[tokio::test]
async fn test_read_yields_raw_document_payload() {
    let (con, store, log) = connector();
    store.script_open(Ok(json!({
        "_id": "org.couchdb.user:alice",
        "_rev": "4-abc",
        "name": "alice",
        "roles": ["reader"],
    })));

    let doc = con
        .read(&json!({ "_id": "org.couchdb.user:alice" }))
        .await
        .unwrap();

    assert_eq!(doc["roles"], json!(["reader"]));
    assert_eq!(logged_calls(&log), vec!["open:org.couchdb.user:alice"]);
}

#[tokio::test]
async fn test_create_yields_id_and_revision_only() {
    let (con, store, _log) = connector();
    store.script_save(Ok(SavedRevision {
        id: "org.couchdb.user:alice".to_string(),
        rev: "1-abc".to_string(),
    }));

    let saved = con.create(&json!({ "name": "alice" })).await.unwrap();

    assert_eq!(saved.id, "org.couchdb.user:alice");
    assert_eq!(saved.rev, "1-abc");
}

#[tokio::test]
async fn test_update_delegates_to_create() {
    let (con, _store, log) = connector();
    let doc = json!({ "_id": "d1", "_rev": "1-abc", "name": "alice" });

    con.create(&doc).await.unwrap();
    con.update(&doc).await.unwrap();

    assert_eq!(logged_calls(&log), vec!["save", "save"]);
}

#[tokio::test]
async fn test_delete_of_already_gone_document_succeeds() {
    let (con, store, log) = connector();
    store.script_remove(Err(StoreError::Remote {
        status: 404,
        error: "deleted".to_string(),
        reason: "deleted".to_string(),
    }));

    con.delete(&json!({ "_id": "d1", "_rev": "1-abc" }))
        .await
        .unwrap();

    // The operation ran to completion: the store was asked once and the
    // future resolved successfully.
    assert_eq!(logged_calls(&log), vec!["remove"]);
}

#[tokio::test]
async fn test_delete_propagates_other_failures() {
    let (con, store, _log) = connector();
    store.script_remove(Err(StoreError::Remote {
        status: 409,
        error: "conflict".to_string(),
        reason: "Document update conflict.".to_string(),
    }));

    let err = con
        .delete(&json!({ "_id": "d1", "_rev": "1-abc" }))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert!(err.is_remote_error());
}

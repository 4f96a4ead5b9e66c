//! Shared test helpers: recording stub collaborators and event draining.
//!
//! Both stubs write into one shared call log, so tests can assert ordering
//! across the store and the auth API (e.g. save strictly before login).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use couchbind::auth::{AuthApi, AuthError, SessionInfo, UserCtx};
use couchbind::connector::Connector;
use couchbind::store::{DocumentStore, SavedRevision, StoreError};
use couchbind::user::UserEvent;
use couchbind::UserModel;

/// Call log shared between stub collaborators.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn logged_calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Build a model over fresh recording stubs sharing one call log.
pub fn test_model() -> (UserModel, Arc<RecordingStore>, Arc<RecordingAuth>, CallLog) {
    let log = new_call_log();
    let store = Arc::new(RecordingStore::new(log.clone()));
    let auth = Arc::new(RecordingAuth::new(log.clone()));
    let model = UserModel::new(Connector::new(store.clone()), auth.clone());
    (model, store, auth, log)
}

/// Collect every event currently queued on the receiver.
pub fn drain_events(rx: &mut broadcast::Receiver<UserEvent>) -> Vec<UserEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Wire names of the given events.
pub fn event_names(events: &[UserEvent]) -> Vec<&'static str> {
    events.iter().map(UserEvent::name).collect()
}

/// Count occurrences of one wire name.
pub fn count_event(events: &[UserEvent], name: &str) -> usize {
    events.iter().filter(|e| e.name() == name).count()
}

/// Document store stub with scripted results.
///
/// Scripted results are consumed in order; without a script, operations
/// succeed with generic payloads.
pub struct RecordingStore {
    log: CallLog,
    open_results: Mutex<VecDeque<Result<Value, StoreError>>>,
    save_results: Mutex<VecDeque<Result<SavedRevision, StoreError>>>,
    remove_results: Mutex<VecDeque<Result<(), StoreError>>>,
}

impl RecordingStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            open_results: Mutex::new(VecDeque::new()),
            save_results: Mutex::new(VecDeque::new()),
            remove_results: Mutex::new(VecDeque::new()),
        }
    }

    pub fn script_open(&self, result: Result<Value, StoreError>) {
        self.open_results.lock().unwrap().push_back(result);
    }

    pub fn script_save(&self, result: Result<SavedRevision, StoreError>) {
        self.save_results.lock().unwrap().push_back(result);
    }

    pub fn script_remove(&self, result: Result<(), StoreError>) {
        self.remove_results.lock().unwrap().push_back(result);
    }

    fn record(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn open_doc(&self, id: &str) -> Result<Value, StoreError> {
        self.record(format!("open:{id}"));
        self.open_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "_id": id })))
    }

    async fn save_doc(&self, _doc: &Value) -> Result<SavedRevision, StoreError> {
        self.record("save".to_string());
        self.save_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(SavedRevision {
                    id: "stub-doc".to_string(),
                    rev: "1-stub".to_string(),
                })
            })
    }

    async fn remove_doc(&self, _doc: &Value) -> Result<(), StoreError> {
        self.record("remove".to_string());
        self.remove_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// Auth API stub with scripted results and signup payload capture.
pub struct RecordingAuth {
    log: CallLog,
    session_results: Mutex<VecDeque<Result<SessionInfo, AuthError>>>,
    signup_results: Mutex<VecDeque<Result<(), AuthError>>>,
    login_results: Mutex<VecDeque<Result<(), AuthError>>>,
    logout_results: Mutex<VecDeque<Result<(), AuthError>>>,
    signup_docs: Mutex<Vec<Value>>,
}

impl RecordingAuth {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            session_results: Mutex::new(VecDeque::new()),
            signup_results: Mutex::new(VecDeque::new()),
            login_results: Mutex::new(VecDeque::new()),
            logout_results: Mutex::new(VecDeque::new()),
            signup_docs: Mutex::new(Vec::new()),
        }
    }

    /// Script the next session result to claim the given user, or an
    /// anonymous context for `None`.
    pub fn script_session_user(&self, name: Option<&str>) {
        let info = SessionInfo {
            user_ctx: UserCtx {
                name: name.map(str::to_owned),
                roles: Vec::new(),
            },
        };
        self.session_results.lock().unwrap().push_back(Ok(info));
    }

    pub fn script_signup(&self, result: Result<(), AuthError>) {
        self.signup_results.lock().unwrap().push_back(result);
    }

    pub fn script_login(&self, result: Result<(), AuthError>) {
        self.login_results.lock().unwrap().push_back(result);
    }

    pub fn script_logout(&self, result: Result<(), AuthError>) {
        self.logout_results.lock().unwrap().push_back(result);
    }

    pub fn last_signup_doc(&self) -> Option<Value> {
        self.signup_docs.lock().unwrap().last().cloned()
    }

    fn record(&self, call: &str) {
        self.log.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl AuthApi for RecordingAuth {
    async fn session(&self) -> Result<SessionInfo, AuthError> {
        self.record("session");
        self.session_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SessionInfo::default()))
    }

    async fn signup(&self, attributes: &Value, _password: &str) -> Result<(), AuthError> {
        self.record("signup");
        self.signup_docs.lock().unwrap().push(attributes.clone());
        self.signup_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn login(&self, _name: &str, _password: &str) -> Result<(), AuthError> {
        self.record("login");
        self.login_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.record("logout");
        self.logout_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

//! Type definitions for the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::store::{ContentCatalog, GameDb, SessionStore, UserStore};
use crate::unlock::ProgressUnlocker;

/// Shared state handed to every request worker
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    pub users: UserStore,
    pub sessions: SessionStore,
    pub content: ContentCatalog,
    pub unlocker: Arc<ProgressUnlocker<UserStore>>,
    pub public_dir: PathBuf,
}

impl ApiState {
    pub fn new(config: Config, db: GameDb) -> Self {
        let ttl = chrono::Duration::days(i64::from(config.auth.session_ttl_days));
        Self {
            public_dir: PathBuf::from(&config.server.public_dir),
            users: UserStore::new(db.clone()),
            sessions: SessionStore::new(db.clone(), ttl),
            content: ContentCatalog::new(db.clone()),
            unlocker: Arc::new(ProgressUnlocker::new(UserStore::new(db))),
            config: Arc::new(config),
        }
    }

    /// Session cookie lifetime in seconds
    pub fn session_max_age(&self) -> i64 {
        self.sessions.ttl().num_seconds()
    }
}

/// Body of `/api/auth/register` and `/api/auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `{ "success": true, "message": ..., "data": ... }`
pub fn success(message: Option<&str>, data: Option<Value>) -> Value {
    let mut body = json!({ "success": true });
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    if let Some(data) = data {
        body["data"] = data;
    }
    body
}

/// `{ "success": false, "message": ... }`
pub fn failure(message: impl AsRef<str>) -> Value {
    json!({ "success": false, "message": message.as_ref() })
}

//! Login sessions keyed by an opaque bearer token

use chrono::Duration;
use rusqlite::{params, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use super::db::GameDb;
use super::{now_ms, StoreError};
use crate::domain::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    db: GameDb,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(db: GameDb, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh token for `user_id`. Expired sessions of every user are
    /// dropped on the way.
    pub fn create(&self, user_id: UserId) -> Result<Session, StoreError> {
        let now = now_ms();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
            expires_at: now.saturating_add(self.ttl.num_milliseconds()),
        };
        let conn = self.db.conn()?;
        let purged = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [now])?;
        if purged > 0 {
            debug!("[letras:sessions] Purged {} expired sessions", purged);
        }
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id.0,
                session.created_at,
                session.expires_at
            ],
        )?;
        Ok(session)
    }

    /// Look up a live session. Expired and unknown tokens both resolve to `None`.
    pub fn resolve(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let conn = self.db.conn()?;
        let session = conn
            .query_row(
                r#"SELECT token, user_id, created_at, expires_at FROM sessions
                   WHERE token = ?1 AND expires_at > ?2"#,
                params![token, now_ms()],
                |r| {
                    Ok(Session {
                        token: r.get(0)?,
                        user_id: UserId(r.get(1)?),
                        created_at: r.get(2)?,
                        expires_at: r.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Returns whether a session was removed
    pub fn revoke(&self, token: &str) -> Result<bool, StoreError> {
        let conn = self.db.conn()?;
        let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
        Ok(removed > 0)
    }

    pub fn purge_expired(&self) -> Result<usize, StoreError> {
        let conn = self.db.conn()?;
        let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [now_ms()])?;
        Ok(removed)
    }
}

//! SQLite database connection and schema for game data
//!
//! Manages `~/.letrasgo/letras.db` (or a configured path).

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::StoreError;

/// Shared handle to the game database
#[derive(Clone)]
pub struct GameDb {
    conn: Arc<Mutex<Connection>>,
}

impl GameDb {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open game db: {}", path.display()))?;

        // WAL lets readers proceed while a progress write is in flight
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Self::from_connection(conn)
    }

    /// Throwaway database, used by tests and the seed dry-run
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize game db schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the connection for one unit of work
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let version = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )?;
        Ok(version)
    }
}

/// SQL schema for the game database
const SCHEMA_SQL: &str = r#"
-- Player accounts
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE COLLATE NOCASE,
    credential_hash TEXT NOT NULL,
    score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0),
    version INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Unlock counters, one row per (user, mode, difficulty)
CREATE TABLE IF NOT EXISTS progress (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    mode TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    unlocked INTEGER NOT NULL DEFAULT 1 CHECK (unlocked BETWEEN 1 AND 10),
    PRIMARY KEY (user_id, mode, difficulty)
);

-- Puzzle catalog
CREATE TABLE IF NOT EXISTS puzzles (
    mode TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    chapter INTEGER NOT NULL CHECK (chapter BETWEEN 1 AND 10),
    solution TEXT NOT NULL,
    pieces TEXT NOT NULL,
    image TEXT,
    audio TEXT,
    PRIMARY KEY (mode, difficulty, chapter)
);

-- Login sessions
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_sessions_expiry ON sessions(expires_at);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

//! Persistence for accounts, progress, puzzle content and sessions
//!
//! Everything lives in one SQLite database (`~/.letrasgo/letras.db` by
//! default). The connection is shared behind a mutex; each store type is a
//! cheap clone around the same [`GameDb`].
//!
//! # Usage
//!
//! ```ignore
//! let db = GameDb::open(&path)?;
//! let users = UserStore::new(db.clone());
//! let content = ContentCatalog::new(db.clone());
//!
//! let spec = content.get(Mode::Words, Difficulty::Easy, Chapter::FIRST)?;
//! ```

mod content;
mod credentials;
mod db;
mod sessions;
mod users;

pub use content::{parse_entries, ContentCatalog, ContentEntry, SeedReport, SAMPLE_CONTENT};
pub use credentials::{hash_password, verify_password};
pub use db::GameDb;
pub use sessions::{Session, SessionStore};
pub use users::{NewUser, UserStore};

use thiserror::Error;

use crate::domain::{Chapter, Difficulty, Mode, PuzzleSpec, UserAccount, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt stored value: {0}")]
    Corrupt(String),

    #[error("database lock poisoned")]
    Poisoned,

    #[error("user {user_id} was modified concurrently")]
    Conflict { user_id: UserId },

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

/// Read access to the puzzle catalog
pub trait ContentStore: Send + Sync {
    fn get(
        &self,
        mode: Mode,
        difficulty: Difficulty,
        chapter: Chapter,
    ) -> Result<Option<PuzzleSpec>, StoreError>;
}

/// Account storage used by the progress unlocker
pub trait ProgressStore: Send + Sync {
    fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError>;

    /// Persist score and progress of `account`.
    ///
    /// Fails with [`StoreError::Conflict`] if the stored version no longer
    /// matches `account.version`. On success the version is bumped in place.
    fn save_user(&self, account: &mut UserAccount) -> Result<(), StoreError>;
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

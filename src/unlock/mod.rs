//! Server-side score and chapter unlock transition
//!
//! A completed puzzle adds its points to the player's score and unlocks the
//! following chapter of the same (mode, difficulty) track. The whole
//! read-modify-write runs under a per-user lock and is persisted with a
//! versioned save, so two requests for the same player never interleave and a
//! write from outside the unlocker is reported instead of overwritten.

mod locks;
mod request;

pub use locks::UserLocks;
pub use request::RawCompletion;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{apply_completion, Completion, Progress, UserId, MAX_SCORE};
use crate::store::{ProgressStore, StoreError};

#[derive(Debug, Error)]
pub enum UnlockError {
    #[error("{0}")]
    Validation(String),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("user {0} was updated concurrently, reload and try again")]
    Conflict(UserId),

    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for UnlockError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { user_id } => UnlockError::Conflict(user_id),
            other => UnlockError::Storage(other),
        }
    }
}

/// New score and progress after a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub score: u64,
    pub progress: Progress,
}

pub struct ProgressUnlocker<S> {
    store: S,
    locks: UserLocks,
}

impl<S: ProgressStore> ProgressUnlocker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate a wire body, then apply it
    pub fn complete_raw(
        &self,
        user_id: UserId,
        raw: &RawCompletion,
    ) -> Result<ProgressUpdate, UnlockError> {
        let completion = raw.validate()?;
        self.complete(user_id, &completion)
    }

    pub fn complete(
        &self,
        user_id: UserId,
        completion: &Completion,
    ) -> Result<ProgressUpdate, UnlockError> {
        self.locks.with_lock(user_id, || -> Result<ProgressUpdate, UnlockError> {
            let mut account = self
                .store
                .get_user(user_id)?
                .ok_or(UnlockError::UserNotFound(user_id))?;

            if apply_completion(&mut account.score, &mut account.progress, completion).is_none() {
                return Err(UnlockError::Validation(format!(
                    "scoreToAdd {} would push the score past {}",
                    completion.score_to_add, MAX_SCORE
                )));
            }

            if let Err(e) = self.store.save_user(&mut account) {
                warn!("[letras:unlock] Save failed for user {}: {}", user_id, e);
                return Err(e.into());
            }

            debug!(
                "[letras:unlock] User {} completed {}/{}/{} (+{}), score {}",
                user_id,
                completion.mode,
                completion.difficulty,
                completion.chapter,
                completion.score_to_add,
                account.score
            );
            Ok(ProgressUpdate {
                score: account.score,
                progress: account.progress,
            })
        })
    }
}

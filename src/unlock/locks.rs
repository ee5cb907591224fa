//! Per-user record locks

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::UserId;

/// Registry of one mutex per user currently being updated.
///
/// Entries are created on demand and dropped again once nobody holds or
/// waits for them, so the map only ever contains users with requests in
/// flight.
#[derive(Default)]
pub struct UserLocks {
    slots: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `user_id`
    pub fn with_lock<T>(&self, user_id: UserId, f: impl FnOnce() -> T) -> T {
        let slot = self.slots().entry(user_id).or_default().clone();

        let result = {
            // The guarded value is (), so a poisoned lock carries no broken state
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut slots = self.slots();
        // One reference in the map, one here: nobody else is waiting
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&user_id);
        }
        result
    }

    /// Number of users with a live lock entry
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<UserId, Arc<Mutex<()>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

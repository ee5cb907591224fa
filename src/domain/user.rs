use serde::{Deserialize, Serialize};

use super::progress::Progress;

/// Unique identifier for a player account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored player account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    /// Lowercased login name
    pub username: String,
    pub credential_hash: String,
    pub score: u64,
    pub progress: Progress,
    /// Bumped on every successful save; used to detect lost updates
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserAccount {
    /// Public view of the account, safe to send to clients
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            score: self.score,
            progress: self.progress.clone(),
        }
    }
}

/// Account data exposed over the API (no credential material)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub score: u64,
    #[serde(default)]
    pub progress: Progress,
}

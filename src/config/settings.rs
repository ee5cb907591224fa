//! Settings sections of `config.toml`

use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind, e.g. "127.0.0.1" or "0.0.0.0"
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listening port. `PORT` in the environment takes precedence.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of request worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Directory with the browser client (index.html, landing.html, game.html, js/, css/...)
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Database settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Empty means `~/.letrasgo/letras.db`.
    /// `LETRASGO_DB` in the environment takes precedence.
    #[serde(default)]
    pub db_path: String,
}

/// Account and session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Session lifetime in days
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: u32,

    /// Add `Secure` to the session cookie. Enable when served over HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,

    #[serde(default = "default_min_username_len")]
    pub min_username_len: usize,

    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,

    /// bcrypt work factor for new password hashes (4..=31)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Points credited for each solved puzzle
    #[serde(default = "default_points_per_puzzle")]
    pub points_per_puzzle: u64,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_workers() -> usize {
    4
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_session_ttl_days() -> u32 {
    7
}

fn default_min_username_len() -> usize {
    3
}

fn default_min_password_len() -> usize {
    4
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_points_per_puzzle() -> u64 {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            workers: default_workers(),
            public_dir: default_public_dir(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_days: default_session_ttl_days(),
            secure_cookies: false,
            min_username_len: default_min_username_len(),
            min_password_len: default_min_password_len(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            points_per_puzzle: default_points_per_puzzle(),
        }
    }
}

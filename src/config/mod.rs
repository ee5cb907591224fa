//! Configuration loading and management

mod io;
mod settings;

pub use settings::{AuthSettings, GameSettings, ServerSettings, StorageSettings};

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.letrasgo/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub game: GameSettings,
}

impl Config {
    /// Resolved database path
    pub fn db_path(&self) -> PathBuf {
        if self.storage.db_path.trim().is_empty() {
            Self::global_config_dir().join("letras.db")
        } else {
            PathBuf::from(self.storage.db_path.trim())
        }
    }

    /// `bind:port` as given to the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    /// Apply `PORT` and `LETRASGO_DB` overrides from `lookup`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = match port.trim().parse() {
                Ok(port) => port,
                Err(_) => bail!("PORT is not a valid port number: {port}"),
            };
        }
        if let Some(db) = lookup("LETRASGO_DB").filter(|v| !v.trim().is_empty()) {
            self.storage.db_path = db;
        }
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.workers == 0 {
            bail!("server.workers must be at least 1");
        }
        if self.server.max_body_bytes == 0 {
            bail!("server.max_body_bytes must be greater than 0");
        }
        if self.auth.session_ttl_days == 0 {
            bail!("auth.session_ttl_days must be at least 1");
        }
        if self.auth.min_username_len == 0 || self.auth.min_password_len == 0 {
            bail!("auth minimum lengths must be at least 1");
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!("auth.bcrypt_cost must be between 4 and 31");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.workers, 4);
        assert_eq!(config.server.max_body_bytes, 64 * 1024);
        assert_eq!(config.auth.session_ttl_days, 7);
        assert_eq!(config.auth.min_username_len, 3);
        assert_eq!(config.auth.min_password_len, 4);
        assert_eq!(config.game.points_per_puzzle, 10);
        assert!(config.db_path().ends_with("letras.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [auth]
            secure_cookies = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert!(config.auth.secure_cookies);
        assert_eq!(config.auth.bcrypt_cost, 10);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[("PORT", "4100"), ("LETRASGO_DB", "/tmp/x.db")]))
            .unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/x.db"));

        let mut config = Config::default();
        config.apply_env_overrides(env(&[("PORT", "")])).unwrap();
        assert_eq!(config.server.port, 3000);

        assert!(
            Config::default()
                .apply_env_overrides(env(&[("PORT", "http")]))
                .is_err()
        );
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = Config::default();
        config.server.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bcrypt_cost_range() {
        let mut config = Config::default();
        for (cost, ok) in [(3, false), (4, true), (31, true), (32, false)] {
            config.auth.bcrypt_cost = cost;
            assert_eq!(config.validate().is_ok(), ok, "cost {cost}");
        }
    }
}

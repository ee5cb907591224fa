//! Init command implementation

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use letrasgo::config::Config;

/// Default configuration content for letrasgo init
pub const DEFAULT_CONFIG: &str = r#"# LetrasGo configuration
# ======================
#
# Environment overrides: PORT (server.port), LETRASGO_DB (storage.db_path)

[server]
# Address and port the game server listens on
bind = "127.0.0.1"
port = 3000
# Request worker threads
workers = 4
# Browser client files (index.html, landing.html, game.html, js/, css/, images/, audio/)
public_dir = "public"
# Largest accepted request body in bytes
max_body_bytes = 65536

[storage]
# SQLite database file. Leave empty for ~/.letrasgo/letras.db
db_path = ""

[auth]
# Session lifetime in days
session_ttl_days = 7
# Mark the session cookie Secure (enable behind HTTPS)
secure_cookies = false
min_username_len = 3
min_password_len = 4
# bcrypt work factor for stored passwords (4..=31)
bcrypt_cost = 10

[game]
# Points credited per solved puzzle
points_per_puzzle = 10
"#;

pub async fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created: {}", config_path.display());

    Ok(())
}

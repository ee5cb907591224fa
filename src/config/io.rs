//! Configuration file I/O operations

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

impl Config {
    /// Get the global config directory path (~/.letrasgo/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".letrasgo")
    }

    /// Get the global config file path (~/.letrasgo/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a file with atomic write and file locking.
    ///
    /// The write goes to a temp file that is renamed over the target while an
    /// exclusive lock on `<file>.lock` is held.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        let _lock = lock_config(path)?;
        write_atomic(path, &content)
        // Lock is released when _lock is dropped
    }

    /// Load `path` (or the global config), creating it with defaults if it
    /// does not exist yet. Environment overrides are applied but not saved.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);

        if !path.exists() {
            Self::auto_init(&path)?;
        }

        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default config to `path`. Existing files are kept unless
    /// `force` is set. Returns whether a file was written.
    pub fn init_file(path: &Path, force: bool) -> Result<bool> {
        let _lock = lock_config(path)?;
        if path.exists() && !force {
            return Ok(false);
        }
        let content = toml::to_string_pretty(&Self::default())
            .with_context(|| "Failed to serialize default config")?;
        write_atomic(path, &content)?;
        Ok(true)
    }

    fn auto_init(path: &Path) -> Result<()> {
        // Another process may have created it while we waited for the lock
        if Self::init_file(path, false)? {
            eprintln!("Created {}", path.display());
        }
        Ok(())
    }
}

/// Take the exclusive config lock, creating the parent directory if needed
fn lock_config(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    // Separate lock file so the rename below does not drop the lock
    let lock_path = path.with_extension("toml.lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

    lock_file
        .lock_exclusive()
        .with_context(|| "Failed to acquire config lock")?;
    Ok(lock_file)
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write config content")?;

    temp_file
        .sync_all()
        .with_context(|| "Failed to sync config file")?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename config file: {}", path.display()))?;
    Ok(())
}

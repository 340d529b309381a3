//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Identity recorded in history when none is configured.
pub const DEFAULT_USER_ID: &str = "current-user";

/// Player volume used when none is configured.
pub const DEFAULT_VOLUME: u8 = 50;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Identity settings.
    #[serde(default)]
    pub user: UserConfig,
    /// Player settings.
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Identity configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    /// Identity written to each history record.
    #[serde(default = "default_user_id")]
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
        }
    }
}

fn default_user_id() -> String {
    String::from(DEFAULT_USER_ID)
}

/// Player configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Initial volume (0-100).
    #[serde(default = "default_volume")]
    pub volume: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
        }
    }
}

const fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

//! Config and data locations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vtv_db::DB_FILE_NAME;

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-user directory name below the XDG base directories.
const APP_DIR_NAME: &str = "vtv";

/// Where vtv keeps its config file and channel database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppDirs {
    /// Resolves both directories from the `--dir` override.
    ///
    /// - If `dir` is `Some`, config and data both live in `dir`.
    /// - Otherwise `$XDG_CONFIG_HOME/vtv` and `$XDG_DATA_HOME/vtv`, falling
    ///   back to `~/.config/vtv` and `~/.local/share/vtv`.
    ///
    /// # Errors
    ///
    /// Returns an error if a base directory falls back to `HOME` and `HOME`
    /// is not set.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        if let Some(d) = dir {
            return Ok(Self {
                config_dir: d.to_path_buf(),
                data_dir: d.to_path_buf(),
            });
        }

        Ok(Self {
            config_dir: base_dir("XDG_CONFIG_HOME", &[".config"])?.join(APP_DIR_NAME),
            data_dir: base_dir("XDG_DATA_HOME", &[".local", "share"])?.join(APP_DIR_NAME),
        })
    }

    /// Path of the TOML config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Path of the `SQLite` channel database.
    #[must_use]
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

/// Returns the directory named by `var`, or `$HOME` joined with `fallback`.
fn base_dir(var: &str, fallback: &[&str]) -> Result<PathBuf> {
    if let Some(value) = std::env::var_os(var).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }

    let home = std::env::var_os("HOME").context("HOME environment variable is not set")?;
    Ok(fallback
        .iter()
        .fold(PathBuf::from(home), |path, part| path.join(part)))
}

//! Application configuration module.
//!
//! Manages the TOML config file holding the history identity and
//! player defaults, and where config and data live on disk.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::AppDirs;

//! Database connection management.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// Default database file name inside the data directory.
pub const DB_FILE_NAME: &str = "vtv.db";

/// Opens (or creates) the database at `path` and runs migrations.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrations fail.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Opened database");

    run_migrations(&conn).context("database migration failed")?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_db_runs_migrations() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_FILE_NAME);

        // Act
        let conn = open_db(&path).unwrap();

        // Assert
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert!(version > 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_db_creates_missing_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("channels.db");

        // Act
        open_db(&path).unwrap();

        // Assert
        assert!(path.exists());
    }
}

//! `kv_store` table access.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use vtv_core::KeyValueStorage;

use super::connection::open_db;

/// Key-value storage over the `kv_store` table.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps an already migrated connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the database file at `path` and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        open_db(path).map(Self::new)
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("failed to read key {key}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        upsert(&self.conn, key, value)
    }

    /// Writes all entries in one transaction.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("failed to begin kv_store transaction")?;
        for (key, value) in entries {
            upsert(&tx, key, value)?;
        }
        tx.commit().context("failed to commit kv_store transaction")
    }
}

/// Inserts or replaces one `kv_store` row.
fn upsert(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        [key, value],
    )
    .with_context(|| format!("failed to write key {key}"))?;
    Ok(())
}

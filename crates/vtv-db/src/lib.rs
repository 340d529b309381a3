//! SQLite persistence for vtv.
//!
//! Uses `rusqlite` (bundled `SQLite`) to back the channel store's
//! key-value storage with a single `kv_store` table.

mod connection;
/// Key-value table access.
pub mod kv;
mod migrations;

pub use connection::{DB_FILE_NAME, open_db};
pub use kv::SqliteStorage;

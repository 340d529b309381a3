//! Key-value storage abstraction.

use std::collections::HashMap;

use anyhow::Result;

/// String key-value storage backing a [`ChannelStore`](crate::ChannelStore).
///
/// Abstracts the persistence medium for substitution in tests.
pub trait KeyValueStorage {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Stores several entries in order.
    ///
    /// Backends with transactions write all entries or none. The default
    /// stops at the first failed write, leaving earlier entries written.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-process storage backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(String::from(key), String::from(value));
        Ok(())
    }
}

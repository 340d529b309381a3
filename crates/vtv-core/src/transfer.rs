//! Bulk channel import and export (`channels.json`).

use std::fmt;

use anyhow::Context;

use crate::channel::{Channel, ChannelDraft};
use crate::clock::{Clock, IdGenerator};
use crate::storage::KeyValueStorage;
use crate::store::ChannelStore;
use crate::validation::validate_channel;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "channels.json";

/// Media type of export files.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Reasons an import is rejected. Nothing is applied in any case.
#[derive(Debug)]
pub enum ImportError {
    /// The payload is not a JSON array of channel records.
    InvalidFormat,
    /// A record parsed but failed validation.
    InvalidChannel {
        /// Zero-based position of the record in the file.
        index: usize,
        /// Validation messages for the record.
        errors: Vec<String>,
    },
    /// Writing the imported channels to storage failed.
    Storage(anyhow::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "Invalid import file format"),
            Self::InvalidChannel { index, errors } => {
                write!(f, "Invalid channel at index {index}: {}", errors.join(", "))
            }
            Self::Storage(_) => write!(f, "failed to store imported channels"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e.as_ref()),
            Self::InvalidFormat | Self::InvalidChannel { .. } => None,
        }
    }
}

/// Serializes channels as pretty-printed JSON (two-space indent).
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_channels(channels: &[Channel]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(channels).context("failed to serialize channels")
}

/// Parses an import payload and validates every record.
///
/// # Errors
///
/// Returns [`ImportError::InvalidFormat`] if the text is not a JSON array of
/// channel records, or [`ImportError::InvalidChannel`] for the first record
/// that fails validation.
pub fn parse_import(text: &str) -> Result<Vec<Channel>, ImportError> {
    let channels: Vec<Channel> = serde_json::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, "Import payload rejected");
        ImportError::InvalidFormat
    })?;

    for (index, ch) in channels.iter().enumerate() {
        let validation = validate_channel(&ChannelDraft::from(ch.clone()));
        if !validation.is_valid {
            return Err(ImportError::InvalidChannel {
                index,
                errors: validation.errors,
            });
        }
    }

    Ok(channels)
}

/// Adds every channel in `text` to the store under a freshly generated id.
///
/// The whole payload is parsed and validated first and then stored in a
/// single write, so a rejected or failed import leaves the store untouched.
/// Returns the new ids in file order.
///
/// # Errors
///
/// Returns an [`ImportError`] if the payload is rejected or storage fails.
pub fn import_channels<S, C, G>(
    store: &mut ChannelStore<S, C, G>,
    text: &str,
    user_id: &str,
) -> Result<Vec<String>, ImportError>
where
    S: KeyValueStorage,
    C: Clock,
    G: IdGenerator,
{
    let mut channels = parse_import(text)?;
    for ch in &mut channels {
        ch.id = store.generate_id();
    }
    let added: Vec<String> = channels.iter().map(|ch| ch.id.clone()).collect();

    store
        .add_channels(channels, user_id)
        .map_err(ImportError::Storage)?;

    tracing::info!(count = added.len(), "Imported channels");
    Ok(added)
}

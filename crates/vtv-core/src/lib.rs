//! Channel management for the vtv virtual TV.
//!
//! Holds the channel model, its validation rules, and a store that keeps the
//! channel list plus an append-only change history in key-value storage.

/// Channel and change-record types.
pub mod channel;
/// Clock and id generator capabilities.
pub mod clock;
mod storage;
mod store;
/// Bulk import and export.
pub mod transfer;
/// Channel form validation.
pub mod validation;

pub use channel::{ChangeRecord, ChangeType, Channel, ChannelDraft, ChannelType, parse_tags};
pub use clock::{Clock, IdGenerator, SystemClock, TimestampIdGenerator};
pub use storage::{KeyValueStorage, MemoryStorage};
#[allow(clippy::module_name_repetitions)]
pub use store::{CHANNELS_KEY, ChannelStore, HISTORY_KEY};
pub use transfer::{ImportError, export_channels, import_channels};
pub use validation::{ValidationResult, is_youtube_url, validate_channel};

//! Channel list and change history synchronized with key-value storage.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::channel::{ChangeRecord, ChangeType, Channel, ChannelDraft};
use crate::clock::{
    Clock, IdGenerator, SystemClock, TimestampIdGenerator, format_timestamp, parse_timestamp,
};
use crate::storage::KeyValueStorage;
use crate::validation::ValidationResult;

/// Storage key of the serialized channel list.
pub const CHANNELS_KEY: &str = "channels";

/// Storage key of the serialized change history.
pub const HISTORY_KEY: &str = "channelHistory";

/// In-memory channel collection plus its append-only change history.
///
/// Every mutation writes the full list back to storage (last write wins).
/// Loading never fails: missing or unparsable data yields an empty store.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ChannelStore<S, C = SystemClock, G = TimestampIdGenerator> {
    storage: S,
    clock: C,
    ids: G,
    channels: Vec<Channel>,
    history: Vec<ChangeRecord>,
}

impl<S: KeyValueStorage> ChannelStore<S> {
    /// Opens a store over `storage` using the system clock and timestamp ids.
    #[must_use]
    pub fn open(storage: S) -> Self {
        Self::with_capabilities(storage, SystemClock, TimestampIdGenerator::new())
    }
}

impl<S, C, G> ChannelStore<S, C, G>
where
    S: KeyValueStorage,
    C: Clock,
    G: IdGenerator,
{
    /// Opens a store with explicit clock and id generator and loads persisted data.
    #[must_use]
    pub fn with_capabilities(storage: S, clock: C, ids: G) -> Self {
        let mut store = Self {
            storage,
            clock,
            ids,
            channels: Vec::new(),
            history: Vec::new(),
        };
        store.load();
        store
    }

    /// Replaces in-memory state with what storage holds.
    ///
    /// Persisted records are trusted as-is; validation is not re-applied.
    /// Every loaded id is passed to the id generator so it is not reissued.
    pub fn load(&mut self) {
        self.channels = read_list(&self.storage, CHANNELS_KEY);
        self.history = read_list(&self.storage, HISTORY_KEY);
        for ch in &self.channels {
            self.ids.observe(&ch.id);
        }
        for r in &self.history {
            self.ids.observe(&r.id);
            self.ids.observe(&r.channel_id);
        }
    }

    /// Writes the full channel list to storage, replacing the previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn persist(&mut self) -> Result<()> {
        let raw = to_json(CHANNELS_KEY, &self.channels)?;
        self.storage
            .set(CHANNELS_KEY, &raw)
            .context("failed to persist channels")
    }

    /// Current channels in insertion order.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Change history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ChangeRecord] {
        &self.history
    }

    /// Looks up a channel by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|ch| ch.id == id)
    }

    /// History entries for one channel, oldest first.
    pub fn history_for<'a>(
        &'a self,
        channel_id: &'a str,
    ) -> impl Iterator<Item = &'a ChangeRecord> {
        self.history
            .iter()
            .filter(move |r| r.channel_id == channel_id)
    }

    /// Returns a fresh identifier from the store's generator.
    pub fn generate_id(&mut self) -> String {
        self.ids.generate()
    }

    /// Consumes the store and returns its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Builds a new channel from a draft: fresh id, both timestamps set to
    /// now, enabled. The store itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns the failed [`ValidationResult`] if the draft is invalid.
    pub fn create_channel(&mut self, draft: ChannelDraft) -> Result<Channel, ValidationResult> {
        let mut channel = draft.into_channel()?;
        let now = format_timestamp(self.clock.now());
        channel.id = self.ids.generate();
        channel.created_at.clone_from(&now);
        channel.last_modified = now;
        channel.is_enabled = true;
        Ok(channel)
    }

    /// Appends `channel` and records a `create` entry.
    ///
    /// The caller is expected to have validated the channel.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to storage fails; the store is unchanged.
    #[instrument(skip_all, fields(channel_id = %channel.id))]
    pub fn add_channel(&mut self, channel: Channel, user_id: &str) -> Result<()> {
        self.add_channels(vec![channel], user_id)
    }

    /// Appends `channels` in order with one `create` entry each, in a single
    /// write.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to storage fails; none of the channels
    /// are added.
    pub fn add_channels(&mut self, channels: Vec<Channel>, user_id: &str) -> Result<()> {
        let mut next = self.channels.clone();
        let mut records = Vec::with_capacity(channels.len());
        for ch in channels {
            next.push(ch.clone());
            records.push(self.change_record(ChangeType::Create, ch, user_id));
        }
        self.commit(next, records)?;
        tracing::debug!(total = self.channels.len(), "Channels added");
        Ok(())
    }

    /// Replaces the channel with the same id and records an `update` entry.
    ///
    /// `last_modified` is set to the current time, never earlier than the
    /// replaced record's value. An unknown id leaves the list untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to storage fails; the store is unchanged.
    #[instrument(skip_all, fields(channel_id = %channel.id))]
    pub fn update_channel(&mut self, mut channel: Channel, user_id: &str) -> Result<()> {
        let now = self.clock.now();
        let mut next = self.channels.clone();
        if let Some(slot) = next.iter_mut().find(|ch| ch.id == channel.id) {
            let modified = parse_timestamp(&slot.last_modified)
                .map_or(now, |prev| prev.max(now));
            channel.last_modified = format_timestamp(modified);
            *slot = channel.clone();
        } else {
            tracing::debug!("No channel with this id, list left unchanged");
        }
        let record = self.change_record(ChangeType::Update, channel, user_id);
        self.commit(next, vec![record])
    }

    /// Removes the channel with `id` and records a `delete` entry holding its
    /// last state.
    ///
    /// Returns `false` without touching list or history if no channel matches.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to storage fails; the store is unchanged.
    #[instrument(skip(self, user_id))]
    pub fn delete_channel(&mut self, id: &str, user_id: &str) -> Result<bool> {
        let Some(pos) = self.channels.iter().position(|ch| ch.id == id) else {
            tracing::debug!("No channel with this id, nothing deleted");
            return Ok(false);
        };
        let mut next = self.channels.clone();
        let removed = next.remove(pos);
        let record = self.change_record(ChangeType::Delete, removed, user_id);
        self.commit(next, vec![record])?;
        Ok(true)
    }

    /// Builds a history entry stamped with a fresh id and the current time.
    fn change_record(
        &mut self,
        change_type: ChangeType,
        channel: Channel,
        user_id: &str,
    ) -> ChangeRecord {
        ChangeRecord {
            id: self.ids.generate(),
            channel_id: channel.id.clone(),
            change_type,
            changes: channel,
            timestamp: format_timestamp(self.clock.now()),
            user_id: String::from(user_id),
        }
    }

    /// Writes `channels` and the history extended by `records`, then adopts
    /// them in memory.
    ///
    /// In-memory state only changes once both keys are written. If the write
    /// fails part way, the previous channel list is written back so storage
    /// does not hold channels without their history.
    fn commit(&mut self, channels: Vec<Channel>, records: Vec<ChangeRecord>) -> Result<()> {
        let committed = self.history.len();
        self.history.extend(records);

        let written = to_json(CHANNELS_KEY, &channels).and_then(|channels_raw| {
            let history_raw = to_json(HISTORY_KEY, &self.history)?;
            self.storage.set_all(&[
                (CHANNELS_KEY, channels_raw.as_str()),
                (HISTORY_KEY, history_raw.as_str()),
            ])
        });

        if let Err(e) = written {
            self.history.truncate(committed);
            if let Err(restore) = self.persist() {
                tracing::warn!(error = %restore, "Failed to restore channels after a failed write");
            }
            return Err(e).context("failed to persist channel changes");
        }

        self.channels = channels;
        Ok(())
    }
}

/// Reads a JSON list from storage, degrading to empty on any failure.
fn read_list<T: DeserializeOwned>(storage: &impl KeyValueStorage, key: &str) -> Vec<T> {
    match storage.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Ignoring unparsable persisted data");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted data");
            Vec::new()
        }
    }
}

/// Serializes a list stored under `key`.
fn to_json<T: Serialize>(key: &str, items: &[T]) -> Result<String> {
    serde_json::to_string(items).with_context(|| format!("failed to serialize {key}"))
}

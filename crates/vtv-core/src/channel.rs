//! Channel and change-record types.
//!
//! Field names serialize in camelCase so that persisted data and
//! import/export files keep the `channels.json` layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, validate_channel};

/// Kind of media a channel points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// A YouTube video or live stream.
    Youtube,
    /// A still image.
    Image,
}

impl ChannelType {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Self::Youtube),
            "image" => Ok(Self::Image),
            other => anyhow::bail!("unknown channel type: {other} (expected youtube or image)"),
        }
    }
}

/// A user-managed media entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Unique identifier. Empty for a record that has not been saved yet.
    #[serde(default)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Media URL.
    pub url: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display image reference.
    #[serde(default)]
    pub thumbnail: String,
    /// Media kind.
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Free-form tags. Order is kept, duplicates are allowed.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Whether the player offers this channel.
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    /// ISO-8601 time of the last update.
    #[serde(default)]
    pub last_modified: String,
    /// ISO-8601 creation time.
    #[serde(default)]
    pub created_at: String,
}

const fn default_enabled() -> bool {
    true
}

/// Operation recorded in the change history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Channel was added.
    Create,
    /// Channel was replaced.
    Update,
    /// Channel was removed.
    Delete,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Append-only audit entry for one channel operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Unique record identifier.
    pub id: String,
    /// Identifier of the affected channel.
    pub channel_id: String,
    /// Kind of operation.
    pub change_type: ChangeType,
    /// Channel payload at the time of the operation.
    pub changes: Channel,
    /// ISO-8601 time of the operation.
    pub timestamp: String,
    /// Identity that performed the operation.
    pub user_id: String,
}

/// Editable form state of a channel.
///
/// `name`, `url` and `channel_type` may be missing until the draft passes
/// [`validate_channel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDraft {
    /// Identifier of the channel being edited, empty for a new one.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Media URL.
    pub url: Option<String>,
    /// Media kind.
    pub channel_type: Option<ChannelType>,
    /// Display image reference.
    pub thumbnail: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Enabled flag.
    pub is_enabled: bool,
    /// Creation time carried over when editing.
    pub created_at: String,
    /// Last update time carried over when editing.
    pub last_modified: String,
}

impl ChannelDraft {
    /// Validates the draft and turns it into a [`Channel`].
    ///
    /// `id` and timestamps are taken from the draft unchanged.
    ///
    /// # Errors
    ///
    /// Returns the failed [`ValidationResult`] when a required field is
    /// missing or malformed.
    pub fn into_channel(self) -> Result<Channel, ValidationResult> {
        let validation = validate_channel(&self);
        if !validation.is_valid {
            return Err(validation);
        }
        let (Some(name), Some(url), Some(channel_type)) = (self.name, self.url, self.channel_type)
        else {
            return Err(validation);
        };

        Ok(Channel {
            id: self.id,
            name,
            url,
            description: self.description,
            thumbnail: self.thumbnail,
            channel_type,
            tags: self.tags,
            category: self.category,
            is_enabled: self.is_enabled,
            last_modified: self.last_modified,
            created_at: self.created_at,
        })
    }
}

impl From<Channel> for ChannelDraft {
    fn from(ch: Channel) -> Self {
        Self {
            id: ch.id,
            name: Some(ch.name),
            url: Some(ch.url),
            channel_type: Some(ch.channel_type),
            thumbnail: ch.thumbnail,
            description: ch.description,
            category: ch.category,
            tags: ch.tags,
            is_enabled: ch.is_enabled,
            created_at: ch.created_at,
            last_modified: ch.last_modified,
        }
    }
}

/// Splits comma-separated tag input, trimming each tag and dropping empties.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

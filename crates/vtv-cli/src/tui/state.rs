//! Player state management.
//!
//! Everything here is ephemeral UI state; nothing is written back to the
//! channel store.

use vtv_core::Channel;

/// Maximum volume.
pub const MAX_VOLUME: u8 = 100;

/// Volume change per key press.
const VOLUME_STEP: u8 = 5;

/// State for the player TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct PlayerState {
    /// Enabled channels in store order.
    pub channels: Vec<Channel>,
    /// Index of the channel on screen.
    pub current: usize,
    /// Power switch.
    pub powered: bool,
    /// Play/pause switch.
    pub playing: bool,
    /// Mute switch.
    pub muted: bool,
    /// Volume level (0-100), kept while muted.
    pub volume: u8,
    /// One-line status message shown in the footer.
    pub status: Option<String>,
}

impl PlayerState {
    /// Creates a powered-on, playing state over the enabled `channels`.
    #[must_use]
    pub fn new(channels: Vec<Channel>, volume: u8) -> Self {
        Self {
            channels: channels.into_iter().filter(|ch| ch.is_enabled).collect(),
            current: 0,
            powered: true,
            playing: true,
            muted: false,
            volume: volume.min(MAX_VOLUME),
            status: None,
        }
    }

    /// Channel currently on screen.
    #[must_use]
    pub fn current_channel(&self) -> Option<&Channel> {
        self.channels.get(self.current)
    }

    /// Volume as heard: zero while muted.
    #[must_use]
    pub const fn effective_volume(&self) -> u8 {
        if self.muted { 0 } else { self.volume }
    }

    /// Toggles power.
    pub const fn toggle_power(&mut self) {
        self.powered = !self.powered;
    }

    /// Toggles play/pause.
    pub const fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Toggles mute.
    pub const fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Sets the volume, clamped to `MAX_VOLUME`.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
    }

    /// Raises the volume by one step.
    pub fn volume_up(&mut self) {
        self.set_volume(self.volume.saturating_add(VOLUME_STEP));
    }

    /// Lowers the volume by one step.
    pub const fn volume_down(&mut self) {
        self.volume = self.volume.saturating_sub(VOLUME_STEP);
    }

    /// Switches to the next channel, wrapping to the first.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn next_channel(&mut self) {
        if !self.powered || self.channels.is_empty() {
            return;
        }
        self.current = (self.current.saturating_add(1)) % self.channels.len();
        self.status = None;
    }

    /// Switches to the previous channel, wrapping to the last.
    pub fn previous_channel(&mut self) {
        if !self.powered || self.channels.is_empty() {
            return;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or_else(|| self.channels.len().saturating_sub(1));
        self.status = None;
    }

    /// Jumps to the channel at `index`; out-of-range indices are ignored.
    pub fn select_channel(&mut self, index: usize) {
        if self.powered && index < self.channels.len() {
            self.current = index;
            self.status = None;
        }
    }
}

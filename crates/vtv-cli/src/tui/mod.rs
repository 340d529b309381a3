//! TUI module for the interactive player.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod player;
/// Player state types.
pub mod state;
mod ui;

pub use player::run_player;

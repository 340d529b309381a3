//! Player TUI main loop.

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use vtv_core::Channel;

use super::state::PlayerState;
use super::ui;

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    /// Keep running.
    Continue,
    /// Leave the player.
    Quit,
    /// Open the given URL in the system browser.
    Open(String),
}

/// Runs the player TUI over `channels` until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_player(channels: Vec<Channel>, volume: u8) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = PlayerState::new(channels, volume);

    let result = run_event_loop(&mut terminal, &mut state);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut PlayerState,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(state, key.code, key.modifiers) {
                KeyOutcome::Continue => {}
                KeyOutcome::Quit => return Ok(()),
                KeyOutcome::Open(url) => {
                    if let Err(e) = open::that(&url) {
                        state.status = Some(format!("failed to open {url}: {e}"));
                    }
                }
            }
        }
    }
}

/// Applies a key press to the player state.
fn handle_key(state: &mut PlayerState, key: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyOutcome::Quit;
        }
        KeyCode::Char('p') => state.toggle_power(),
        KeyCode::Char(' ') => state.toggle_play(),
        KeyCode::Char('m') => state.toggle_mute(),
        KeyCode::Char('+' | '=') => state.volume_up(),
        KeyCode::Char('-') => state.volume_down(),
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j') => state.next_channel(),
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => state.previous_channel(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(n) = c.to_digit(10) {
                state.select_channel(usize::try_from(n).unwrap_or(0).saturating_sub(1));
            }
        }
        KeyCode::Char('o') => {
            if state.powered
                && let Some(ch) = state.current_channel()
            {
                return KeyOutcome::Open(ch.url.clone());
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

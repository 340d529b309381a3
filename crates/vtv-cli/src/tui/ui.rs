//! TUI rendering logic for the player.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use super::state::PlayerState;

/// Draws the player UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &PlayerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // screen + channel list
            Constraint::Length(3), // controls
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[0]);

    draw_screen(frame, main_chunks[0], state);
    draw_channel_list(frame, main_chunks[1], state);
    draw_controls(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);
}

/// Draws the TV screen with the current channel.
fn draw_screen(frame: &mut Frame, area: Rect, state: &PlayerState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" vtv ");

    if !state.powered {
        frame.render_widget(block, area);
        return;
    }

    let Some(ch) = state.current_channel() else {
        let placeholder = Paragraph::new("No channels")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let play_marker = if state.playing {
        Span::styled("\u{25b6} Playing", Style::default().fg(Color::Green))
    } else {
        Span::styled("\u{23f8} Paused", Style::default().fg(Color::Yellow))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            ch.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(play_marker),
        Line::from(""),
        Line::from(format!("Type:  {}", ch.channel_type)),
        Line::from(format!("URL:   {}", ch.url)),
    ];
    if !ch.thumbnail.is_empty() {
        lines.push(Line::from(format!("Image: {}", ch.thumbnail)));
    }
    if let Some(category) = &ch.category {
        lines.push(Line::from(format!("Category: {category}")));
    }
    if !ch.tags.is_empty() {
        lines.push(Line::from(format!("Tags: {}", ch.tags.join(", "))));
    }
    if let Some(description) = &ch.description {
        lines.push(Line::from(""));
        lines.push(Line::from(description.clone()));
    }

    let screen = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(screen, area);
}

/// Draws the channel list (right pane).
fn draw_channel_list(frame: &mut Frame, area: Rect, state: &PlayerState) {
    let items: Vec<ListItem> = state
        .channels
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let is_current = i == state.current;
            let marker = if is_current { "\u{25b8} " } else { "  " };
            let style = if is_current && state.powered {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(String::from(marker)),
                Span::styled(format!("{:>2} {}", i.saturating_add(1), ch.name), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Channels "));
    frame.render_widget(list, area);
}

/// Draws power state and the volume slider.
#[allow(clippy::indexing_slicing)]
fn draw_controls(frame: &mut Frame, area: Rect, state: &PlayerState) {
    let control_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let power = if state.powered {
        Span::styled("\u{23fb} ON", Style::default().fg(Color::Green))
    } else {
        Span::styled("\u{23fb} OFF", Style::default().fg(Color::Red))
    };
    let power = Paragraph::new(Line::from(power))
        .block(Block::default().borders(Borders::ALL).title(" Power "));
    frame.render_widget(power, control_chunks[0]);

    let title = if state.muted { " Volume (muted) " } else { " Volume " };
    let volume = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(Color::Blue))
        .percent(u16::from(state.effective_volume()));
    frame.render_widget(volume, control_chunks[1]);
}

/// Draws the footer with key hints or the status message.
fn draw_footer(frame: &mut Frame, area: Rect, state: &PlayerState) {
    let text = state.status.as_deref().unwrap_or(
        "p: power  Space: play/pause  m: mute  +/-: volume  \u{2190}\u{2192}/h/l: channel  1-9: jump  o: open  q: quit",
    );

    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

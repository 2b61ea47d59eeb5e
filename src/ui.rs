//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, View};
use crate::catalog::Track;
use crate::config::UiSettings;
use crate::error::MediaError;
use crate::player::PlaybackState;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play from cursor"),
    ("a", "play album"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("c", "jump to current"),
    ("x", "clear queue"),
    ("tab", "library/queue"),
    ("K", "metadata"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the status line: now playing, play flag, queue position and the
/// last media failure.
pub(crate) fn status_text(state: &PlaybackState, last_error: Option<&MediaError>) -> String {
    let mut parts: Vec<String> = Vec::new();

    match (state.current_track(), state.current_index()) {
        (Some(track), Some(idx)) => {
            parts.push(format!("Song: {}", track.display));
            parts.push(if state.is_playing() { "Playing" } else { "Paused" }.to_string());
            parts.push(format!("Queue: {}/{}", idx + 1, state.queue().len()));
        }
        _ => parts.push("Stopped".to_string()),
    }

    if let Some(e) = last_error {
        parts.push(format!("Error: {e}"));
    }

    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
pub(crate) fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

fn metadata_text(track: Option<&Track>) -> String {
    match track {
        Some(track) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}",
            track.title,
            track.artist.as_deref().unwrap_or("-"),
            track.album.as_deref().unwrap_or("-"),
            format_duration_mmss_ceil(track.duration),
            track.path.display()
        ),
        None => "No track selected".to_string(),
    }
}

/// First and one-past-last rows to render so the cursor stays centered.
pub(crate) fn visible_window(total: usize, height: usize, cursor: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let start = cursor.saturating_sub(half).min(total - height);
    (start, start + height)
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    state: &PlaybackState,
    last_error: Option<&MediaError>,
    ui_settings: &UiSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let mut status = status_text(state, last_error);
    if let Some(dir) = &app.current_dir {
        status.push_str(&format!(" • Dir: {dir}"));
    }
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let tracks = app.visible(state);
        let total = tracks.len();
        let cursor = app.cursor().min(total.saturating_sub(1));
        let (start, end) = visible_window(total, chunks[2].height as usize, cursor);
        let current_id = state.current_track().map(|t| &t.id);
        let queue_view = app.view == View::Queue;

        // Only build ListItems for the visible window.
        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let is_current = if queue_view {
                    state.current_index() == Some(start + offset)
                } else {
                    current_id == Some(&track.id)
                };
                let marker = if is_current { "♪ " } else { "  " };
                let item = ListItem::new(format!("{marker}{}", track.display));
                if is_current {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let title = match app.view {
            View::Library => " library ".to_string(),
            View::Queue => format!(" queue ({}) ", total),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ratatui::widgets::ListState::default();
        if total > 0 {
            list_state.select(Some(cursor - start));
        }
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let track = app.cursor_track(state);
        let meta_paragraph = Paragraph::new(metadata_text(track.as_deref()))
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests;

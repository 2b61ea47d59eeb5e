use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, View};
use crate::catalog::{Catalog, Collection};
use crate::config;
use crate::presence::ControlCmd;
use crate::runtime::session::Session;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: handles input, UI drawing, media completion
/// and MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session,
    catalog: &dyn Catalog,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if session.tick() > 0 {
            app.clamp(session.state());
        }

        terminal.draw(|f| ui::draw(f, app, session.state(), session.last_error(), &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if session.control(&cmd).is_break() {
                return Ok(());
            }
            app.clamp(session.state());
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, session, catalog, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub(super) fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    session: &mut Session,
    catalog: &dyn Catalog,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.toggle_view(session.state()),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(session.state()),
        KeyCode::Char('j') | KeyCode::Down => app.next(session.state()),
        KeyCode::Char('k') | KeyCode::Up => app.prev(session.state()),
        KeyCode::Char('c') => {
            app.focus_current(session.state());
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Enter => play_cursor(app, session),
        KeyCode::Char('a') => play_cursor_album(app, session, catalog),
        // Transport keys map onto the same commands as MPRIS.
        KeyCode::Char('p') | KeyCode::Char(' ') => transport(ControlCmd::PlayPause, app, session),
        KeyCode::Char('l') => transport(ControlCmd::Next, app, session),
        KeyCode::Char('h') => transport(ControlCmd::Prev, app, session),
        KeyCode::Char('x') => {
            session.update(|store| store.reset());
            app.clamp(session.state());
        }
        _ => {}
    }

    false
}

fn transport(cmd: ControlCmd, app: &mut App, session: &mut Session) {
    // Transport commands never break the loop; only `q` and MPRIS Quit do.
    let _ = session.control(&cmd);
    app.clamp(session.state());
}

fn play_cursor(app: &mut App, session: &mut Session) {
    match app.view {
        View::Library => {
            if app.library.is_empty() {
                return;
            }
            let tracks = app.library.clone();
            let start = app.cursor();
            session.update(|store| store.play_from_queue(tracks, start));
        }
        View::Queue => {
            let track = app.cursor_track(session.state());
            session.update(|store| store.select_track(track));
        }
    }
    app.clamp(session.state());
}

fn play_cursor_album(app: &mut App, session: &mut Session, catalog: &dyn Catalog) {
    let Some(track) = app.cursor_track(session.state()) else {
        return;
    };
    let Some(album) = track.album.clone() else {
        debug!(track = %track.id, "cursor track has no album");
        return;
    };
    let tracks = catalog.tracks(&Collection::Album(album));
    let start = tracks.iter().position(|t| t.id == track.id).unwrap_or(0);
    session.update(|store| store.play_from_queue(tracks, start));
    app.clamp(session.state());
}

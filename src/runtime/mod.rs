use std::env;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, View};
use crate::catalog::{Catalog, Collection, DirectoryCatalog};
use crate::logging;
use crate::media::RodioOutput;
use crate::player::PlayerStore;
use crate::presence::{ControlCmd, NoPresence, PresenceNotifier, spawn_mpris};
use crate::sync::MediaSynchronizer;

mod event_loop;
mod session;
mod settings;
mod startup;

use session::Session;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_error) = settings::load_settings();
    let log_path = logging::init(&settings.logging)?;
    if let Some(e) = settings_error {
        warn!(error = %e, "using default settings");
    }
    info!(log = %log_path.display(), "encore starting");

    let dir = env::args().nth(1).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let catalog = DirectoryCatalog::scan(Path::new(&dir), &settings.library);
    if catalog.is_empty() {
        warn!(dir = %catalog.root().display(), "no audio files found");
    } else {
        info!(
            dir = %catalog.root().display(),
            tracks = catalog.tracks(&Collection::All).len(),
            albums = catalog.albums().len(),
            "library scanned"
        );
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let presence: Box<dyn PresenceNotifier> = if settings.presence.enabled {
        Box::new(spawn_mpris(&settings.presence.identity, control_tx))
    } else {
        Box::new(NoPresence)
    };

    let mut store = PlayerStore::new(settings.presence.resolved_subject_id(), presence);
    startup::seed_queue(&mut store, &catalog, &settings.playback);

    let output = RodioOutput::new(settings.audio.clone());
    let mut session = Session::new(store, MediaSynchronizer::new(Box::new(output)));

    let mut app = App::new(catalog.tracks(&Collection::All));
    app.set_current_dir(dir.clone());
    if settings.ui.show_queue_on_start {
        app.view = View::Queue;
    }
    app.focus_current(session.state());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut session,
            &catalog,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("encore stopped");

    run_result
}

#[cfg(test)]
mod tests;

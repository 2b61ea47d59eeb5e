use super::session::apply_control;
use super::*;
use crate::catalog::{Track, TrackId};
use crate::config::PlaybackSettings;
use crate::error::MediaError;
use crate::media::{MediaEvent, MediaOutput, MediaSubscription};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::Cell;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

fn t(id: &str) -> Track {
    Track {
        id: TrackId::new(id),
        path: PathBuf::from(format!("/music/{id}.mp3")),
        title: id.into(),
        artist: None,
        album: None,
        duration: None,
        display: id.into(),
    }
}

fn catalog(ids: &[&str]) -> DirectoryCatalog {
    DirectoryCatalog::from_tracks(Path::new("/music"), ids.iter().map(|id| t(id)).collect())
}

fn store() -> PlayerStore {
    PlayerStore::new("u1", Box::new(NoPresence))
}

fn current(store: &PlayerStore) -> Option<String> {
    store
        .state()
        .current_track()
        .map(|t| t.id.as_str().to_string())
}

#[test]
fn seed_queue_installs_catalog_paused_by_default() {
    let mut s = store();
    startup::seed_queue(&mut s, &catalog(&["a", "b"]), &PlaybackSettings::default());
    assert_eq!(s.state().queue().len(), 2);
    assert_eq!(current(&s).as_deref(), Some("a"));
    assert!(!s.state().is_playing());
}

#[test]
fn seed_queue_autoplays_when_configured() {
    let mut s = store();
    let playback = PlaybackSettings { autoplay: true };
    startup::seed_queue(&mut s, &catalog(&["a", "b"]), &playback);
    assert!(s.state().is_playing());
}

#[test]
fn seed_queue_with_empty_catalog_stays_idle() {
    let mut s = store();
    let playback = PlaybackSettings { autoplay: true };
    startup::seed_queue(&mut s, &catalog(&[]), &playback);
    assert!(s.state().current_track().is_none());
    assert!(!s.state().is_playing());
}

#[test]
fn play_and_pause_commands_only_toggle_when_needed() {
    let mut s = store();
    s.initialize_queue(vec![Arc::new(t("a"))]);

    let _ = apply_control(&ControlCmd::Pause, &mut s);
    assert!(!s.state().is_playing());
    let _ = apply_control(&ControlCmd::Play, &mut s);
    assert!(s.state().is_playing());
    let _ = apply_control(&ControlCmd::Play, &mut s);
    assert!(s.state().is_playing());
    let _ = apply_control(&ControlCmd::Stop, &mut s);
    assert!(!s.state().is_playing());
    assert_eq!(current(&s).as_deref(), Some("a"));
}

#[test]
fn play_pause_next_prev_map_to_store_operations() {
    let mut s = store();
    s.initialize_queue(vec![Arc::new(t("a")), Arc::new(t("b"))]);

    let _ = apply_control(&ControlCmd::PlayPause, &mut s);
    assert!(s.state().is_playing());
    let _ = apply_control(&ControlCmd::Next, &mut s);
    assert_eq!(current(&s).as_deref(), Some("b"));
    let _ = apply_control(&ControlCmd::Prev, &mut s);
    assert_eq!(current(&s).as_deref(), Some("a"));
}

#[test]
fn quit_command_breaks() {
    let mut s = store();
    assert_eq!(apply_control(&ControlCmd::Quit, &mut s), ControlFlow::Break(()));
    assert_eq!(
        apply_control(&ControlCmd::Next, &mut s),
        ControlFlow::Continue(())
    );
}

struct CountingOutput {
    loads: Rc<Cell<usize>>,
    events: Option<Receiver<MediaEvent>>,
}

impl MediaOutput for CountingOutput {
    fn load(&mut self, _locator: &Path) -> Result<(), MediaError> {
        self.loads.set(self.loads.get() + 1);
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn set_position(&mut self, _position: Duration) -> Result<(), MediaError> {
        Ok(())
    }

    fn subscribe(&mut self) -> Option<MediaSubscription> {
        self.events.take().map(MediaSubscription::new)
    }

    fn shutdown(&mut self, _fade_out: Duration) {}
}

#[test]
fn session_reconciles_after_each_update_and_tick() {
    let loads = Rc::new(Cell::new(0));
    let (tx, rx) = mpsc::channel();
    let output = CountingOutput {
        loads: loads.clone(),
        events: Some(rx),
    };
    let mut s = store();
    startup::seed_queue(&mut s, &catalog(&["a", "b", "c"]), &PlaybackSettings::default());

    let mut session = Session::new(s, MediaSynchronizer::new(Box::new(output)));
    assert_eq!(loads.get(), 1);

    assert!(session.control(&ControlCmd::Next).is_continue());
    assert_eq!(loads.get(), 2);
    assert!(session.state().is_playing());

    tx.send(MediaEvent::Finished(PathBuf::from("/music/b.mp3"))).unwrap();
    assert_eq!(session.tick(), 1);
    assert_eq!(loads.get(), 3);
    assert_eq!(
        session.state().current_track().map(|t| t.id.as_str()),
        Some("c")
    );

    session.shutdown(Duration::ZERO);
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn counting_session(ids: &[&str]) -> (Session, Rc<Cell<usize>>) {
    let loads = Rc::new(Cell::new(0));
    let (_tx, rx) = mpsc::channel();
    let output = CountingOutput {
        loads: loads.clone(),
        events: Some(rx),
    };
    let mut s = store();
    startup::seed_queue(&mut s, &catalog(ids), &PlaybackSettings::default());
    (Session::new(s, MediaSynchronizer::new(Box::new(output))), loads)
}

#[test]
fn transport_keys_apply_before_the_next_tick() {
    let cat = catalog(&["a", "b", "c"]);
    let (mut session, loads) = counting_session(&["a", "b", "c"]);
    let mut app = App::new(cat.tracks(&Collection::All));
    let mut keys = event_loop::EventLoopState::default();

    assert!(!event_loop::handle_key_event(key('l'), &mut app, &mut session, &cat, &mut keys));
    assert_eq!(
        session.state().current_track().map(|t| t.id.as_str()),
        Some("b")
    );
    assert!(session.state().is_playing());
    assert_eq!(loads.get(), 2);

    event_loop::handle_key_event(key(' '), &mut app, &mut session, &cat, &mut keys);
    assert!(!session.state().is_playing());
    event_loop::handle_key_event(key('h'), &mut app, &mut session, &cat, &mut keys);
    assert_eq!(
        session.state().current_track().map(|t| t.id.as_str()),
        Some("a")
    );
    session.shutdown(Duration::ZERO);
}

#[test]
fn clear_key_resets_the_queue() {
    let cat = catalog(&["a", "b"]);
    let (mut session, _loads) = counting_session(&["a", "b"]);
    let mut app = App::new(cat.tracks(&Collection::All));
    let mut keys = event_loop::EventLoopState::default();

    event_loop::handle_key_event(key('x'), &mut app, &mut session, &cat, &mut keys);
    assert!(session.state().queue().is_empty());
    assert!(session.state().current_track().is_none());
    assert!(!session.state().is_playing());
    session.shutdown(Duration::ZERO);
}

#[test]
fn quit_key_asks_to_stop() {
    let cat = catalog(&["a"]);
    let (mut session, _loads) = counting_session(&["a"]);
    let mut app = App::new(cat.tracks(&Collection::All));
    let mut keys = event_loop::EventLoopState::default();
    assert!(event_loop::handle_key_event(key('q'), &mut app, &mut session, &cat, &mut keys));
    session.shutdown(Duration::ZERO);
}

use super::*;
use crate::catalog::TrackId;
use crate::player::PlayerStore;
use crate::presence::NoPresence;
use std::path::PathBuf;
use std::sync::Arc;

fn t(id: &str) -> Arc<Track> {
    Arc::new(Track {
        id: TrackId::new(id),
        path: PathBuf::from(format!("/music/{id}.mp3")),
        title: id.into(),
        artist: None,
        album: None,
        duration: None,
        display: format!("Artist - {id}"),
    })
}

#[test]
fn status_reports_stopped_without_selection() {
    let store = PlayerStore::new("u1", Box::new(NoPresence));
    assert_eq!(status_text(store.state(), None), "Stopped");
}

#[test]
fn status_shows_song_flag_and_queue_position() {
    let mut store = PlayerStore::new("u1", Box::new(NoPresence));
    store.play_from_queue(vec![t("a"), t("b"), t("c")], 1);
    assert_eq!(
        status_text(store.state(), None),
        "Song: Artist - b • Playing • Queue: 2/3"
    );
    store.toggle_play();
    assert!(status_text(store.state(), None).contains("Paused"));
}

#[test]
fn status_includes_last_media_error() {
    let store = PlayerStore::new("u1", Box::new(NoPresence));
    let err = MediaError::Device("no output".into());
    assert_eq!(
        status_text(store.state(), Some(&err)),
        "Stopped • Error: audio device unavailable: no output"
    );
}

#[test]
fn visible_window_centers_cursor() {
    assert_eq!(visible_window(5, 10, 3), (0, 5));
    assert_eq!(visible_window(100, 10, 0), (0, 10));
    assert_eq!(visible_window(100, 10, 50), (45, 55));
    assert_eq!(visible_window(100, 10, 99), (90, 100));
    assert_eq!(visible_window(100, 0, 50), (0, 100));
}

#[test]
fn duration_rounds_partial_seconds_up() {
    assert_eq!(format_duration_mmss_ceil(None), "-");
    assert_eq!(
        format_duration_mmss_ceil(Some(Duration::from_millis(61_200))),
        "1:02 (62s)"
    );
    assert_eq!(
        format_duration_mmss_ceil(Some(Duration::from_secs(60))),
        "1:00 (60s)"
    );
}

use tracing::info;

use crate::catalog::{Catalog, Collection};
use crate::config::PlaybackSettings;
use crate::player::PlayerStore;

/// Seed the queue with the whole catalog and honour `playback.autoplay`.
pub fn seed_queue(store: &mut PlayerStore, catalog: &dyn Catalog, playback: &PlaybackSettings) {
    store.initialize_queue(catalog.tracks(&Collection::All));

    if playback.autoplay && !store.is_playing() {
        store.toggle_play();
    }
    info!(
        tracks = store.queue().len(),
        index = ?store.current_index(),
        current = ?store.current_track().map(|t| t.id.as_str()),
        playing = store.is_playing(),
        "initial queue"
    );
}

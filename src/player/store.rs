use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{Track, TrackId};
use crate::presence::{PresenceEvent, PresenceNotifier};

use super::state::PlaybackState;

/// The playback state container.
///
/// One store exists per session. It is created in the runtime and lent to
/// the synchronizer and the UI; nothing reaches it through globals. Every
/// transition is synchronous, never fails, and publishes a presence event
/// when it changes what is audible.
pub struct PlayerStore {
    state: PlaybackState,
    subject_id: String,
    presence: Box<dyn PresenceNotifier>,
}

impl PlayerStore {
    pub fn new(subject_id: impl Into<String>, presence: Box<dyn PresenceNotifier>) -> Self {
        Self {
            state: PlaybackState::default(),
            subject_id: subject_id.into(),
            presence,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn queue(&self) -> &[Arc<Track>] {
        self.state.queue()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.state.current_track()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Install `tracks` as the queue without starting playback.
    ///
    /// With nothing selected the first track becomes current. With a track
    /// already selected the track stays current, but its index is not kept
    /// as-is: it moves to the track's position in the new queue, and the
    /// track is appended if the new queue lacks it. Keeping the old number
    /// could point at a different track or past the end.
    pub fn initialize_queue(&mut self, tracks: Vec<Arc<Track>>) {
        self.commit("initialize_queue", |s| {
            s.queue = tracks;
            match s.current_track.clone() {
                Some(current) => s.select_or_append(current),
                None => s.select_index(0),
            }
        });
    }

    /// Replace the queue and start playing at `start_index`.
    ///
    /// Empty `tracks` is ignored; an out-of-range index is clamped to the last track.
    pub fn play_from_queue(&mut self, tracks: Vec<Arc<Track>>, start_index: usize) {
        if tracks.is_empty() {
            return;
        }
        let index = start_index.min(tracks.len() - 1);
        if index != start_index {
            warn!(start_index, len = tracks.len(), "start index out of range, clamped");
        }
        self.commit("play_from_queue", |s| {
            s.queue = tracks;
            s.select_index(index);
            s.is_playing = true;
        });
    }

    /// Make `track` current and play it.
    ///
    /// A track missing from the queue is appended so the index and the
    /// current track never disagree.
    pub fn select_track(&mut self, track: Option<Arc<Track>>) {
        let Some(track) = track else {
            return;
        };
        self.commit("select_track", |s| {
            s.select_or_append(track);
            s.is_playing = true;
        });
    }

    /// Flip the play flag. Does nothing while no track is selected.
    pub fn toggle_play(&mut self) {
        self.commit("toggle_play", |s| {
            if s.current_track.is_some() {
                s.is_playing = !s.is_playing;
            }
        });
    }

    /// Play the next track, wrapping to the start of the queue.
    pub fn advance(&mut self) {
        self.commit("advance", |s| {
            let len = s.queue.len();
            if len == 0 {
                return;
            }
            let next = s.current_index.map_or(0, |i| (i + 1) % len);
            s.select_index(next);
            s.is_playing = true;
        });
    }

    /// Play the previous track, wrapping to the end of the queue.
    pub fn retreat(&mut self) {
        self.commit("retreat", |s| {
            let len = s.queue.len();
            if len == 0 {
                return;
            }
            let prev = match s.current_index {
                Some(i) if i > 0 => i - 1,
                _ => len - 1,
            };
            s.select_index(prev);
            s.is_playing = true;
        });
    }

    /// Return to the initial state: empty queue, nothing selected, paused.
    pub fn reset(&mut self) {
        self.commit("reset", |s| *s = PlaybackState::default());
    }

    fn commit(&mut self, op: &'static str, transition: impl FnOnce(&mut PlaybackState)) {
        let before: (Option<TrackId>, bool) =
            (self.state.current_id().cloned(), self.state.is_playing);

        transition(&mut self.state);
        debug_assert!(self.state.is_consistent(), "{op} broke the playback invariants");

        let changed = self.state.current_id() != before.0.as_ref()
            || self.state.is_playing != before.1;
        debug!(
            op,
            index = ?self.state.current_index,
            playing = self.state.is_playing,
            queue_len = self.state.queue.len(),
            changed,
            "transition"
        );
        if changed {
            self.publish_presence();
        }
    }

    fn publish_presence(&self) {
        let event = PresenceEvent::new(
            &self.subject_id,
            self.state.current_track.as_ref(),
            self.state.is_playing,
        );
        if let Err(e) = self.presence.notify(&event) {
            warn!(error = %e, label = %event.label(), "presence notification dropped");
        }
    }
}

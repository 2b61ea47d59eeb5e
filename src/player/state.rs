use std::sync::Arc;

use crate::catalog::{Track, TrackId};

/// Queue, current position and play flag.
///
/// Invariants, upheld by every `PlayerStore` transition:
/// - `current_index.is_none() == current_track.is_none()`
/// - `current_index == Some(i)` implies `queue[i].id == current_track.id`
/// - `is_playing` implies a current track
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub(super) queue: Vec<Arc<Track>>,
    pub(super) current_index: Option<usize>,
    pub(super) current_track: Option<Arc<Track>>,
    pub(super) is_playing: bool,
}

impl PlaybackState {
    pub fn queue(&self) -> &[Arc<Track>] {
        &self.queue
    }

    /// Position of the current track in the queue; `None` when nothing is selected.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub(super) fn current_id(&self) -> Option<&TrackId> {
        self.current_track.as_ref().map(|t| &t.id)
    }

    pub(super) fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.queue.iter().position(|t| &t.id == id)
    }

    /// Point the selection at `queue[index]`. `index` must be in range.
    pub(super) fn select_index(&mut self, index: usize) {
        self.current_track = self.queue.get(index).cloned();
        self.current_index = self.current_track.as_ref().map(|_| index);
    }

    /// Select `track`, appending it when the queue does not contain it.
    pub(super) fn select_or_append(&mut self, track: Arc<Track>) {
        let index = match self.position_of(&track.id) {
            Some(i) => i,
            None => {
                self.queue.push(track.clone());
                self.queue.len() - 1
            }
        };
        self.current_index = Some(index);
        self.current_track = Some(track);
    }

    /// Check the invariants listed on the type.
    pub fn is_consistent(&self) -> bool {
        let selection_agrees = match (self.current_index, &self.current_track) {
            (None, None) => true,
            (Some(i), Some(track)) => self.queue.get(i).is_some_and(|q| q.id == track.id),
            _ => false,
        };
        selection_agrees && (!self.is_playing || self.current_track.is_some())
    }
}

//! Application model types: `App` and `View`.
//!
//! `App` holds what only the terminal front-end cares about: the library
//! listing, which list is shown and where the cursor sits. Playback state
//! lives in the player store and is passed in where needed.

use std::sync::Arc;

use crate::catalog::Track;
use crate::player::PlaybackState;

/// Which list the main pane shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    /// Every scanned track.
    #[default]
    Library,
    /// The player's queue.
    Queue,
}

/// The main application model.
pub struct App {
    pub library: Vec<Arc<Track>>,
    pub view: View,
    pub metadata_window: bool,
    pub current_dir: Option<String>,
    library_cursor: usize,
    queue_cursor: usize,
}

impl App {
    /// Create a new `App` listing `library`.
    pub fn new(library: Vec<Arc<Track>>) -> Self {
        Self {
            library,
            view: View::Library,
            metadata_window: false,
            current_dir: None,
            library_cursor: 0,
            queue_cursor: 0,
        }
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Switch between the library and queue lists.
    pub fn toggle_view(&mut self, state: &PlaybackState) {
        self.view = match self.view {
            View::Library => View::Queue,
            View::Queue => View::Library,
        };
        self.clamp(state);
    }

    /// Tracks in the active list.
    pub fn visible<'a>(&'a self, state: &'a PlaybackState) -> &'a [Arc<Track>] {
        match self.view {
            View::Library => &self.library,
            View::Queue => state.queue(),
        }
    }

    /// Cursor position in the active list.
    pub fn cursor(&self) -> usize {
        match self.view {
            View::Library => self.library_cursor,
            View::Queue => self.queue_cursor,
        }
    }

    /// Track under the cursor, if the active list is not empty.
    pub fn cursor_track(&self, state: &PlaybackState) -> Option<Arc<Track>> {
        self.visible(state).get(self.cursor()).cloned()
    }

    /// Move the cursor down one entry, wrapping to the top.
    pub fn next(&mut self, state: &PlaybackState) {
        let len = self.visible(state).len();
        if len == 0 {
            return;
        }
        let next = (self.cursor() + 1) % len;
        self.set_cursor(next);
    }

    /// Move the cursor up one entry, wrapping to the bottom.
    pub fn prev(&mut self, state: &PlaybackState) {
        let len = self.visible(state).len();
        if len == 0 {
            return;
        }
        let prev = match self.cursor() {
            0 => len - 1,
            c => (c - 1).min(len - 1),
        };
        self.set_cursor(prev);
    }

    pub fn first(&mut self) {
        self.set_cursor(0);
    }

    pub fn last(&mut self, state: &PlaybackState) {
        let len = self.visible(state).len();
        self.set_cursor(len.saturating_sub(1));
    }

    /// Put the cursor on the current track in the active list.
    ///
    /// Returns `false` when there is no current track or the active list
    /// does not contain it.
    pub fn focus_current(&mut self, state: &PlaybackState) -> bool {
        let Some(current) = state.current_track() else {
            return false;
        };
        let found = match self.view {
            View::Queue => state.current_index(),
            View::Library => self.library.iter().position(|t| t.id == current.id),
        };
        match found {
            Some(i) => {
                self.set_cursor(i);
                true
            }
            None => false,
        }
    }

    /// Keep the cursor inside the active list after the list changed.
    pub fn clamp(&mut self, state: &PlaybackState) {
        let len = self.visible(state).len();
        let cursor = self.cursor().min(len.saturating_sub(1));
        self.set_cursor(cursor);
    }

    fn set_cursor(&mut self, idx: usize) {
        match self.view {
            View::Library => self.library_cursor = idx,
            View::Queue => self.queue_cursor = idx,
        }
    }
}

//! Track catalog: the collaborator that supplies sequences of tracks.
//!
//! The player never validates catalog output beyond identity and locator; it
//! just holds `Arc<Track>` references handed out here.

mod display;
mod model;
mod scan;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use model::{Track, TrackId};
pub use scan::scan;

use crate::config::LibrarySettings;

/// A named slice of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    /// Every track, in display order.
    All,
    /// Tracks tagged with this album, in file order.
    Album(String),
}

/// Source of track sequences for the player and UI.
pub trait Catalog {
    fn tracks(&self, collection: &Collection) -> Vec<Arc<Track>>;

    /// Distinct album names, sorted.
    fn albums(&self) -> Vec<String>;
}

/// Catalog backed by a scanned music directory.
pub struct DirectoryCatalog {
    root: PathBuf,
    tracks: Vec<Arc<Track>>,
}

impl DirectoryCatalog {
    /// Scan `root` according to `settings`.
    pub fn scan(root: &Path, settings: &LibrarySettings) -> Self {
        Self::from_tracks(root, scan(root, settings))
    }

    pub fn from_tracks(root: &Path, tracks: Vec<Track>) -> Self {
        Self {
            root: root.to_path_buf(),
            tracks: tracks.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Catalog for DirectoryCatalog {
    fn tracks(&self, collection: &Collection) -> Vec<Arc<Track>> {
        match collection {
            Collection::All => self.tracks.clone(),
            Collection::Album(name) => {
                let mut album: Vec<Arc<Track>> = self
                    .tracks
                    .iter()
                    .filter(|t| t.album.as_deref() == Some(name.as_str()))
                    .cloned()
                    .collect();
                album.sort_by(|a, b| a.path.cmp(&b.path));
                album
            }
        }
    }

    fn albums(&self) -> Vec<String> {
        self.tracks
            .iter()
            .filter_map(|t| t.album.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

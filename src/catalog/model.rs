use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Stable identity of a track within one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable track metadata as produced by a catalog.
///
/// The player shares tracks as `Arc<Track>`; nothing downstream mutates them.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    /// Locator of the audio payload.
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// Artist name for labels, `"Unknown Artist"` when the tags had none.
    pub fn artist_or_unknown(&self) -> &str {
        self.artist
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or("Unknown Artist")
    }
}

//! Presence: outbound "what is this user listening to" notifications.
//!
//! The playback store is handed a [`PresenceNotifier`] at construction and
//! calls it after every transition that changes the current track or the
//! play flag. Delivery is fire-and-forget; the store only logs failures.

mod mpris;

use std::fmt;
use std::sync::Arc;
#[cfg(test)]
use std::sync::mpsc::Sender;

pub use mpris::{ControlCmd, MprisPresence, spawn_mpris};

use crate::catalog::Track;
use crate::error::PresenceError;

/// What a subject is currently doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// Audio is audible.
    NowPlaying { title: String, artist: String },
    /// Nothing audible (paused or nothing selected).
    Idle,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::NowPlaying { title, artist } => write!(f, "Playing {title} by {artist}"),
            Activity::Idle => f.write_str("Idle"),
        }
    }
}

/// One presence notification.
#[derive(Debug, Clone)]
pub struct PresenceEvent {
    pub subject_id: String,
    pub activity: Activity,
    /// The selected track, if any, for channels that publish richer metadata.
    pub track: Option<Arc<Track>>,
}

impl PresenceEvent {
    pub fn new(subject_id: &str, track: Option<&Arc<Track>>, playing: bool) -> Self {
        let activity = match track {
            Some(t) if playing => Activity::NowPlaying {
                title: t.title.clone(),
                artist: t.artist_or_unknown().to_string(),
            },
            _ => Activity::Idle,
        };
        Self {
            subject_id: subject_id.to_string(),
            activity,
            track: track.cloned(),
        }
    }

    /// Human-readable label, e.g. `"Playing Song by Artist"` or `"Idle"`.
    pub fn label(&self) -> String {
        self.activity.to_string()
    }
}

/// A presence channel.
pub trait PresenceNotifier {
    fn notify(&self, event: &PresenceEvent) -> Result<(), PresenceError>;
}

/// Presence disabled: accepts and drops every event.
pub struct NoPresence;

impl PresenceNotifier for NoPresence {
    fn notify(&self, _event: &PresenceEvent) -> Result<(), PresenceError> {
        Ok(())
    }
}

/// Forwards events over a channel; lets tests observe what the store publishes.
#[cfg(test)]
pub struct ChannelPresence {
    tx: Sender<PresenceEvent>,
}

#[cfg(test)]
impl ChannelPresence {
    pub fn new(tx: Sender<PresenceEvent>) -> Self {
        Self { tx }
    }
}

#[cfg(test)]
impl PresenceNotifier for ChannelPresence {
    fn notify(&self, event: &PresenceEvent) -> Result<(), PresenceError> {
        self.tx
            .send(event.clone())
            .map_err(|_| PresenceError::Unavailable)
    }
}

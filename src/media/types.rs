//! Media-related small types: backend commands, events and the
//! single-owner event subscription.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::error::MediaError;

/// Requests sent to the audio thread. None of them are awaited.
#[derive(Debug)]
pub enum MediaCmd {
    /// Replace the loaded payload. The new payload starts paused.
    Load(PathBuf),
    /// Start or resume output of the loaded payload.
    Play,
    /// Stop output, keeping the position.
    Pause,
    /// Move the playback position of the loaded payload.
    Seek(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Events emitted by a media output.
#[derive(Debug)]
pub enum MediaEvent {
    /// The payload at this locator played to its end. Emitted once per load.
    Finished(PathBuf),
    /// A request could not be honoured.
    Failed(MediaError),
}

/// The one listener attached to a media output.
///
/// Taken from the output exactly once; dropping it detaches the listener and
/// later events are discarded by the backend.
pub struct MediaSubscription {
    rx: Receiver<MediaEvent>,
}

impl MediaSubscription {
    pub fn new(rx: Receiver<MediaEvent>) -> Self {
        Self { rx }
    }

    /// Drain the events that are already pending, without blocking.
    pub fn pending(&self) -> Vec<MediaEvent> {
        self.rx.try_iter().collect()
    }
}

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;
use crate::error::MediaError;

use super::thread::spawn_media_thread;
use super::types::{MediaCmd, MediaEvent, MediaSubscription};

/// The addressable audio output the synchronizer drives.
///
/// Every request is asynchronous: `Ok` means the request was accepted, not
/// that it succeeded. Later failures arrive as [`MediaEvent::Failed`].
pub trait MediaOutput {
    fn load(&mut self, locator: &Path) -> Result<(), MediaError>;
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
    fn set_position(&mut self, position: Duration) -> Result<(), MediaError>;

    /// Attach the single event listener. Returns `None` once taken.
    fn subscribe(&mut self) -> Option<MediaSubscription>;

    /// Stop output and release the device, fading out over `fade_out`.
    fn shutdown(&mut self, fade_out: Duration);
}

/// Media output backed by a `rodio` audio thread.
pub struct RodioOutput {
    tx: Sender<MediaCmd>,
    events: Option<Receiver<MediaEvent>>,
    join: Option<JoinHandle<()>>,
}

impl RodioOutput {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();
        let join = spawn_media_thread(rx, events_tx, audio_settings);

        Self {
            tx,
            events: Some(events_rx),
            join: Some(join),
        }
    }

    fn send(&self, cmd: MediaCmd) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }
}

impl MediaOutput for RodioOutput {
    fn load(&mut self, locator: &Path) -> Result<(), MediaError> {
        self.send(MediaCmd::Load(locator.to_path_buf()))
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send(MediaCmd::Play)
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.send(MediaCmd::Pause)
    }

    fn set_position(&mut self, position: Duration) -> Result<(), MediaError> {
        self.send(MediaCmd::Seek(position))
    }

    fn subscribe(&mut self) -> Option<MediaSubscription> {
        self.events.take().map(MediaSubscription::new)
    }

    fn shutdown(&mut self, fade_out: Duration) {
        let Some(join) = self.join.take() else {
            return;
        };
        let fade_out_ms = u64::try_from(fade_out.as_millis()).unwrap_or(u64::MAX);
        let _ = self.send(MediaCmd::Quit { fade_out_ms });
        let _ = join.join();
        debug!("media output shut down");
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.shutdown(Duration::ZERO);
    }
}

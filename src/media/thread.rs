use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::config::AudioSettings;
use crate::error::MediaError;

use super::sink::create_sink_at;
use super::types::{MediaCmd, MediaEvent};

/// How often the thread checks whether the loaded payload ran out.
const FINISH_POLL: Duration = Duration::from_millis(200);

pub(super) fn spawn_media_thread(
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped; noisy under a TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device");
                None
            }
        };

        let mut deck = Deck::new(stream, events, audio_settings.volume);
        loop {
            match rx.recv_timeout(FINISH_POLL) {
                Ok(cmd) => {
                    if deck.handle(cmd).is_break() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => deck.poll_finished(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("media thread exiting");
    })
}

/// State owned by the audio thread.
pub(super) struct Deck {
    stream: Option<OutputStream>,
    events: Sender<MediaEvent>,
    volume: f32,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    paused: bool,
    finished_sent: bool,
}

impl Deck {
    pub(super) fn new(stream: Option<OutputStream>, events: Sender<MediaEvent>, volume: f32) -> Self {
        Self {
            stream,
            events,
            volume,
            sink: None,
            loaded: None,
            paused: true,
            finished_sent: false,
        }
    }

    pub(super) fn handle(&mut self, cmd: MediaCmd) -> ControlFlow<()> {
        match cmd {
            MediaCmd::Load(path) => self.load(path),
            MediaCmd::Play => match self.sink.as_ref() {
                Some(sink) => {
                    sink.play();
                    self.paused = false;
                }
                // A failed load was already reported.
                None if self.loaded.is_some() => {}
                None => self.fail(MediaError::NothingLoaded),
            },
            MediaCmd::Pause => {
                if let Some(sink) = self.sink.as_ref() {
                    sink.pause();
                }
                self.paused = true;
            }
            MediaCmd::Seek(pos) => self.seek(pos),
            MediaCmd::Quit { fade_out_ms } => {
                if let Some(sink) = self.sink.as_ref() {
                    if !self.paused {
                        fade_out_sink(sink, fade_out_ms, self.volume);
                    }
                    sink.stop();
                }
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn load(&mut self, path: PathBuf) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        // A new payload always starts paused; the caller decides when to play.
        self.paused = true;
        self.finished_sent = false;
        self.loaded = Some(path.clone());

        let Some(stream) = self.stream.as_ref() else {
            self.fail(MediaError::Device("no audio output device".to_string()));
            return;
        };
        match create_sink_at(stream, &path, Duration::ZERO) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                debug!(path = %path.display(), "payload loaded");
                self.sink = Some(sink);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Rebuild the sink at `pos`; `skip_duration` is the seeking primitive.
    fn seek(&mut self, pos: Duration) {
        if self.loaded.is_none() {
            self.fail(MediaError::NothingLoaded);
            return;
        }
        // No sink means the load failed and was reported.
        let (Some(stream), Some(path), Some(_)) =
            (self.stream.as_ref(), self.loaded.as_ref(), self.sink.as_ref())
        else {
            return;
        };

        match create_sink_at(stream, path, pos) {
            Ok(sink) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                sink.set_volume(self.volume);
                if !self.paused {
                    sink.play();
                }
                self.finished_sent = false;
                self.sink = Some(sink);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Emit `Finished` once when an unpaused sink has run dry.
    pub(super) fn poll_finished(&mut self) {
        let (Some(sink), Some(path)) = (self.sink.as_ref(), self.loaded.as_ref()) else {
            return;
        };
        if self.paused || self.finished_sent || !sink.empty() {
            return;
        }
        self.finished_sent = true;
        self.paused = true;
        // Nobody listening any more is fine.
        let _ = self.events.send(MediaEvent::Finished(path.clone()));
    }

    fn fail(&self, error: MediaError) {
        warn!(error = %error, "media request failed");
        let _ = self.events.send(MediaEvent::Failed(error));
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64, volume: f32) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

//! Keeps the single media output in step with the playback store.
//!
//! The store never touches the output. After each transition the runtime
//! hands the new state to [`MediaSynchronizer::reconcile`], and on every
//! tick [`MediaSynchronizer::pump`] feeds completion events back into the
//! store as `advance()` calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::TrackId;
use crate::error::MediaError;
use crate::media::{MediaEvent, MediaOutput, MediaSubscription};
use crate::player::{PlaybackState, PlayerStore};

pub struct MediaSynchronizer {
    // Declared before `output` so it is released first on drop.
    subscription: Option<MediaSubscription>,
    output: Box<dyn MediaOutput>,
    loaded: Option<PathBuf>,
    seen_track: Option<TrackId>,
    seen_playing: bool,
    last_error: Option<MediaError>,
}

impl MediaSynchronizer {
    /// Take ownership of `output` and its completion subscription.
    ///
    /// Starts from the empty snapshot; the first `reconcile` loads whatever
    /// the store already has selected.
    pub fn new(mut output: Box<dyn MediaOutput>) -> Self {
        let subscription = output.subscribe();
        if subscription.is_none() {
            warn!("media output already subscribed; completion will not advance the queue");
        }
        Self {
            subscription,
            output,
            loaded: None,
            seen_track: None,
            seen_playing: false,
            last_error: None,
        }
    }

    /// Locator of the payload most recently handed to the output.
    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    /// The most recent media failure, if any, for display.
    pub fn last_error(&self) -> Option<&MediaError> {
        self.last_error.as_ref()
    }

    /// Bring the output in line with `state`.
    pub fn reconcile(&mut self, state: &PlaybackState) {
        let current = state.current_track();
        let playing = state.is_playing();
        let track_changed = current.map(|t| &t.id) != self.seen_track.as_ref();
        let playing_changed = playing != self.seen_playing;

        let mut issued_play = false;
        if let Some(track) = current.filter(|_| track_changed) {
            if self.loaded.as_deref() != Some(track.path.as_path()) {
                self.reload(&track.path);
                if playing {
                    self.request(|o| o.play());
                    issued_play = true;
                }
            }
        }

        if playing_changed && !issued_play && self.loaded.is_some() {
            if playing {
                self.request(|o| o.play());
            } else {
                self.request(|o| o.pause());
            }
        }

        self.seen_track = current.map(|t| t.id.clone());
        self.seen_playing = playing;
    }

    /// Drain pending media events into `store`.
    ///
    /// Each completion of the loaded payload advances the queue exactly once;
    /// completions of a payload that has since been replaced are dropped.
    /// Returns the number of completions handled.
    pub fn pump(&mut self, store: &mut PlayerStore) -> usize {
        let events = match &self.subscription {
            Some(subscription) => subscription.pending(),
            None => return 0,
        };
        let mut finished = 0;
        for event in events {
            match event {
                MediaEvent::Finished(locator) => {
                    // Completion of a payload that was replaced before this
                    // event was drained.
                    if self.loaded() != Some(locator.as_path()) {
                        debug!(path = %locator.display(), "ignoring stale completion");
                        continue;
                    }
                    finished += 1;
                    store.advance();
                    let state = store.state();
                    // Advancing onto the payload that just ended (single-track
                    // queue) needs an explicit restart; reconcile sees no change.
                    let restart = state
                        .current_track()
                        .is_some_and(|t| self.loaded.as_deref() == Some(t.path.as_path()));
                    self.reconcile(state);
                    if restart {
                        debug!("restarting finished payload");
                        self.request(|o| o.set_position(Duration::ZERO));
                        self.request(|o| o.play());
                    }
                }
                MediaEvent::Failed(e) => self.record(e),
            }
        }
        finished
    }

    /// Release the subscription and stop the output, fading out over `fade_out`.
    pub fn shutdown(mut self, fade_out: Duration) {
        self.subscription = None;
        self.output.shutdown(fade_out);
        info!("media synchronizer shut down");
    }

    fn reload(&mut self, locator: &Path) {
        debug!(path = %locator.display(), "loading payload");
        self.last_error = None;
        self.request(|o| o.load(locator));
        self.request(|o| o.set_position(Duration::ZERO));
        // Recorded even when the load failed so the same locator is not retried.
        self.loaded = Some(locator.to_path_buf());
    }

    fn request(&mut self, op: impl FnOnce(&mut dyn MediaOutput) -> Result<(), MediaError>) {
        if let Err(e) = op(self.output.as_mut()) {
            self.record(e);
        }
    }

    fn record(&mut self, error: MediaError) {
        warn!(error = %error, "media request failed");
        self.last_error = Some(error);
    }
}

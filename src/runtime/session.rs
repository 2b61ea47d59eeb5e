use std::ops::ControlFlow;
use std::time::Duration;

use tracing::debug;

use crate::error::MediaError;
use crate::player::{PlaybackState, PlayerStore};
use crate::presence::ControlCmd;
use crate::sync::MediaSynchronizer;

/// The store and its synchronizer, driven together by the event loop.
///
/// Every store transition goes through [`Session::update`] so the media
/// output is reconciled before the next input is read.
pub struct Session {
    store: PlayerStore,
    sync: MediaSynchronizer,
}

impl Session {
    pub fn new(store: PlayerStore, mut sync: MediaSynchronizer) -> Self {
        sync.reconcile(store.state());
        Self { store, sync }
    }

    pub fn state(&self) -> &PlaybackState {
        self.store.state()
    }

    pub fn last_error(&self) -> Option<&MediaError> {
        self.sync.last_error()
    }

    /// Run one store transition, then reconcile the media output.
    pub fn update(&mut self, op: impl FnOnce(&mut PlayerStore)) {
        op(&mut self.store);
        self.sync.reconcile(self.store.state());
    }

    /// Apply a remote or keyboard transport command.
    pub fn control(&mut self, cmd: &ControlCmd) -> ControlFlow<()> {
        debug!(?cmd, "control command");
        let mut flow = ControlFlow::Continue(());
        self.update(|store| flow = apply_control(cmd, store));
        flow
    }

    /// Feed pending media events back into the store. Returns the number of
    /// completed payloads.
    pub fn tick(&mut self) -> usize {
        self.sync.pump(&mut self.store)
    }

    pub fn shutdown(self, fade_out: Duration) {
        self.sync.shutdown(fade_out);
    }
}

/// Map a transport command onto store operations.
///
/// `Play` and `Pause` only toggle when the flag differs; `Stop` pauses.
pub fn apply_control(cmd: &ControlCmd, store: &mut PlayerStore) -> ControlFlow<()> {
    let playing = store.is_playing();
    match cmd {
        ControlCmd::Quit => return ControlFlow::Break(()),
        ControlCmd::Play => {
            if !playing {
                store.toggle_play();
            }
        }
        ControlCmd::Pause | ControlCmd::Stop => {
            if playing {
                store.toggle_play();
            }
        }
        ControlCmd::PlayPause => store.toggle_play(),
        ControlCmd::Next => store.advance(),
        ControlCmd::Prev => store.retreat(),
    }
    ControlFlow::Continue(())
}

//! Playback state store: queue, current track and play flag.

mod state;
mod store;

pub use state::PlaybackState;
pub use store::PlayerStore;

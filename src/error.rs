//! Error types shared across the player.
//!
//! None of these ever escape a store transition: media and presence failures
//! are absorbed at their boundary and only logged or recorded for display.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a media output backend.
#[derive(Error, Debug)]
pub enum MediaError {
    /// No usable audio device (or the device went away).
    #[error("audio device unavailable: {0}")]
    Device(String),

    /// The payload could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The payload was opened but its format is not playable.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// A transport command arrived before anything was loaded.
    #[error("nothing loaded")]
    NothingLoaded,

    /// The backend thread is gone.
    #[error("media output disconnected")]
    Disconnected,
}

/// Failures reported by a presence channel.
#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("presence channel unavailable")]
    Unavailable,

    #[error("presence bus error: {0}")]
    Bus(String),
}

/// Application-level errors surfaced from startup and the terminal loop.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

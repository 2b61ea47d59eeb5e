//! File logging for the terminal player.
//!
//! The TUI owns stdout, so events go to a log file. `RUST_LOG` takes
//! precedence over the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_log_path};
use crate::error::{Error, Result};

/// Install the global subscriber. Returns the log file in use.
pub fn init(settings: &LoggingSettings) -> Result<PathBuf> {
    let path = settings
        .file
        .clone()
        .or_else(default_log_path)
        .ok_or_else(|| Error::Logging("no log file location; set logging.file".to_string()))?;
    let file = open_log_file(&path)?;
    let filter = log_filter(&settings.level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(path)
}

pub(crate) fn log_filter(level: &str) -> Result<EnvFilter> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("unknown log level {level:?}")))?;
    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy())
}

pub(crate) fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

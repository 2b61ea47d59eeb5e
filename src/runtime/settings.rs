use crate::config;
use crate::error::Error;

/// Load and validate settings.
///
/// Config is optional: any failure yields defaults plus the error, which the
/// caller logs once logging is up.
pub fn load_settings() -> (config::Settings, Option<Error>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (config::Settings::default(), Some(Error::InvalidConfig(msg))),
        },
        Err(e) => (config::Settings::default(), Some(Error::Config(e))),
    }
}

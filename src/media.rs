//! Media output boundary.
//!
//! [`MediaOutput`] is the abstract device that produces sound from a loaded
//! payload; [`RodioOutput`] implements it with a dedicated audio thread that
//! owns the `rodio` stream and sink.

mod output;
mod sink;
mod thread;
mod types;

pub use output::{MediaOutput, RodioOutput};
pub use types::{MediaCmd, MediaEvent, MediaSubscription};

//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the library listing,
//! the active view and the cursor.

mod model;

pub use model::*;

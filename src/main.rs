mod app;
mod catalog;
mod config;
mod error;
mod logging;
mod media;
mod player;
mod presence;
mod runtime;
mod sync;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

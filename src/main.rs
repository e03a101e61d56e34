use log::{error, info, LevelFilter};
use std::error::Error;

mod app;
mod config;
mod geometry;
mod renderer;
mod shading;

fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    info!("Application starting...");

    // --- Run Application ---
    if let Err(e) = app::run() {
        error!("Application exited with error: {}", e);
        return Err(e);
    }

    info!("Application exited gracefully.");
    Ok(())
}

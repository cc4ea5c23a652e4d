//! Fatigue Monitor Runtime
//!
//! Drives the fatigue pipeline from a landmark source on a single
//! sequential worker: calibration first, then per-frame monitoring ticks.
//! Periodic snapshots are pushed to the session store fire-and-forget;
//! presentation observations go out over a non-blocking channel.

pub mod runner;
pub mod settings;
pub mod source;

pub use runner::{MonitorEvent, MonitorRuntime, SessionOutcome, StopRequest};
pub use settings::MonitorSettings;
pub use source::{scripted_landmarks, CapturedFrame, LandmarkSource, ScriptedSource};

use session_store::StoreError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

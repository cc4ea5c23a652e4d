//! Fatigue State Machine
//!
//! Real-time operator fatigue classification from per-frame eye/mouth
//! geometry:
//! - Per-user calibration of EAR/MAR thresholds
//! - Blink detection with hysteresis and incomplete-blink classification
//! - Yawn detection with a minimum-duration gate
//! - Saccadic (iris) velocity accumulation
//! - Weighted composite fatigue scoring
//! - Cooldown-gated alerting
//!
//! All state is owned by an explicit session context; nothing survives
//! across sessions.

pub mod alert;
pub mod blink;
pub mod calibration;
pub mod config;
pub mod iris;
pub mod sample;
pub mod scorer;
pub mod session;
pub mod yawn;

pub use alert::{AlertGate, AlertSeverity, FiredAlert};
pub use calibration::{CalibrationPhase, CalibrationProfile, Calibrator};
pub use config::{AlertConfig, CalibrationConfig, DetectorConfig, FatigueConfig, ScoringConfig};
pub use sample::FrameSample;
pub use scorer::{score, FatigueReason, FatigueVerdict};
pub use session::{
    FatigueMoment, FatigueSession, FinalReport, MetricsSnapshot, SessionAccumulators, TickOutput,
};

use thiserror::Error;

/// Fatigue pipeline error types
#[derive(Error, Debug)]
pub enum FatigueError {
    #[error("Calibration has not completed (phase: {0:?})")]
    CalibrationIncomplete(CalibrationPhase),
}

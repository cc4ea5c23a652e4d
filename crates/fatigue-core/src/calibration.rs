//! Per-user calibration stage
//!
//! Collects a fixed-duration baseline of EAR/MAR samples and derives the
//! personalized thresholds the detectors run against. Runs before
//! monitoring and never interleaves with it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CalibrationConfig;
use crate::sample::FrameSample;
use crate::FatigueError;

/// Calibration state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalibrationPhase {
    #[default]
    NotStarted,
    Collecting,
    Complete,
}

/// Personalized thresholds derived from the baseline sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Mean EAR over the calibration window
    pub baseline_ear: f64,
    /// Mean MAR over the calibration window
    pub baseline_mar: f64,
    /// EAR below this counts as a closed eye
    pub close_threshold: f64,
    /// EAR above this counts as a reopened eye
    pub open_threshold: f64,
    /// MAR above this counts as an open mouth
    pub yawn_threshold: f64,
}

/// Baseline collector
pub struct Calibrator {
    config: CalibrationConfig,
    phase: CalibrationPhase,
    started_at: f64,
    ears: Vec<f64>,
    mars: Vec<f64>,
    profile: Option<CalibrationProfile>,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            phase: CalibrationPhase::NotStarted,
            started_at: 0.0,
            ears: Vec::new(),
            mars: Vec::new(),
            profile: None,
        }
    }

    /// Begin collecting at the given session clock reading
    ///
    /// Restarting an in-progress or completed calibration discards its
    /// samples and profile (explicit recalibration).
    pub fn begin(&mut self, now: f64) {
        debug!("Calibration collecting for {}s", self.config.duration_secs);
        self.phase = CalibrationPhase::Collecting;
        self.started_at = now;
        self.ears.clear();
        self.mars.clear();
        self.profile = None;
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// Seconds of collection remaining, for display
    pub fn remaining_secs(&self, now: f64) -> f64 {
        (self.config.duration_secs - (now - self.started_at)).max(0.0)
    }

    /// Profile derived on completion
    pub fn profile(&self) -> Result<CalibrationProfile, FatigueError> {
        self.profile
            .ok_or(FatigueError::CalibrationIncomplete(self.phase))
    }

    /// Feed one frame's metrics; returns the profile when the window closes
    ///
    /// The transition to `Complete` fires once the configured duration has
    /// elapsed AND at least one sample was collected. If no face was ever
    /// tracked during the window, collection simply extends until one is.
    pub fn observe(&mut self, sample: &FrameSample) -> Option<CalibrationProfile> {
        if self.phase != CalibrationPhase::Collecting {
            return None;
        }

        self.ears.push(sample.ear);
        self.mars.push(sample.mar);

        let elapsed = sample.timestamp - self.started_at;
        if elapsed < self.config.duration_secs || self.ears.is_empty() {
            return None;
        }

        let profile = self.derive_profile();
        self.ears.clear();
        self.mars.clear();
        self.phase = CalibrationPhase::Complete;
        self.profile = Some(profile);

        info!(
            baseline_ear = profile.baseline_ear,
            baseline_mar = profile.baseline_mar,
            close_threshold = profile.close_threshold,
            open_threshold = profile.open_threshold,
            yawn_threshold = profile.yawn_threshold,
            "Calibration complete"
        );

        Some(profile)
    }

    fn derive_profile(&self) -> CalibrationProfile {
        let baseline_ear = mean(&self.ears);
        let baseline_mar = mean(&self.mars);

        CalibrationProfile {
            baseline_ear,
            baseline_mar,
            close_threshold: baseline_ear * self.config.close_ratio,
            open_threshold: baseline_ear * self.config.open_ratio,
            yawn_threshold: (baseline_mar + self.config.yawn_offset).max(self.config.yawn_floor),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

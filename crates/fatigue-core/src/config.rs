//! Fatigue pipeline configuration
//!
//! Every threshold and weight in the scorer is configuration rather than a
//! hardcoded constant; the defaults below are the authoritative values the
//! pipeline was validated against.

use serde::{Deserialize, Serialize};

/// Calibration stage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Baseline collection duration (seconds)
    pub duration_secs: f64,

    /// Close threshold as a fraction of baseline EAR
    pub close_ratio: f64,

    /// Open threshold as a fraction of baseline EAR
    pub open_ratio: f64,

    /// Minimum yawn threshold regardless of baseline MAR
    pub yawn_floor: f64,

    /// Offset added to baseline MAR for the yawn threshold
    pub yawn_offset: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10.0,
            close_ratio: 0.55,
            open_ratio: 0.85,
            yawn_floor: 0.5,
            yawn_offset: 0.30,
        }
    }
}

/// Event detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum continuous mouth-open duration for a counted yawn (seconds)
    pub min_yawn_secs: f64,

    /// A blink is incomplete when its minimum EAR stays above
    /// `close_threshold * incomplete_depth_ratio`
    pub incomplete_depth_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_yawn_secs: 1.5,
            incomplete_depth_ratio: 0.7,
        }
    }
}

/// Weighted scoring thresholds and weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// PERCLOS percentage at or above which eyes are closed too often
    pub perclos_threshold_pct: f64,
    pub perclos_weight: u32,

    /// Blink count at or below which blinking is scarce, once at least
    /// `scarce_blink_min_frames` frames have been observed
    pub scarce_blink_max: u32,
    pub scarce_blink_min_frames: u64,
    pub scarce_blink_weight: u32,

    /// Incomplete-blink percentage threshold
    pub incomplete_threshold_pct: f64,
    pub incomplete_weight: u32,

    /// Any yawning at all contributes
    pub yawn_weight: u32,

    /// Average iris velocity below this suggests reduced ocular engagement
    pub velocity_floor: f64,
    pub velocity_weight: u32,
    /// Iris displacement samples required before average velocity is trusted
    pub min_iris_samples: u64,

    /// Accumulated eyelid closure time threshold (seconds)
    pub closure_threshold_secs: f64,
    pub closure_weight: u32,

    /// Maximum interblink gap threshold (seconds)
    pub interblink_gap_secs: f64,
    pub interblink_gap_weight: u32,

    /// Subjective self-report (1-9 scale) at or above which it contributes
    pub self_report_min: u8,
    pub self_report_weight: u32,

    /// Composite score at or above which the verdict is fatigued
    pub fatigue_score: u32,

    /// Composite score at or above which a fired alert is tagged severe
    pub severe_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            perclos_threshold_pct: 28.0,
            perclos_weight: 3,
            scarce_blink_max: 5,
            scarce_blink_min_frames: 60,
            scarce_blink_weight: 3,
            incomplete_threshold_pct: 20.0,
            incomplete_weight: 2,
            yawn_weight: 1,
            velocity_floor: 0.02,
            velocity_weight: 1,
            min_iris_samples: 5,
            closure_threshold_secs: 3.0,
            closure_weight: 1,
            interblink_gap_secs: 10.0,
            interblink_gap_weight: 2,
            self_report_min: 7,
            self_report_weight: 1,
            fatigue_score: 3,
            severe_score: 5,
        }
    }
}

/// Alert throttling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Minimum time between fired alerts (seconds)
    pub cooldown_secs: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 30.0,
        }
    }
}

/// Complete fatigue pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FatigueConfig {
    pub calibration: CalibrationConfig,
    pub detector: DetectorConfig,
    pub scoring: ScoringConfig,
    pub alert: AlertConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let cfg = FatigueConfig::default();
        assert_eq!(cfg.calibration.duration_secs, 10.0);
        assert!(cfg.calibration.close_ratio < cfg.calibration.open_ratio);
        assert_eq!(cfg.detector.min_yawn_secs, 1.5);
        assert_eq!(cfg.scoring.fatigue_score, 3);
        assert_eq!(cfg.alert.cooldown_secs, 30.0);
    }
}

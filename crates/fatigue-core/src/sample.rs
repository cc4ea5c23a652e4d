//! Per-frame metric sample

use face_geometry::FaceMetrics;
use serde::{Deserialize, Serialize};

/// One tracked frame's geometry metrics plus timing
///
/// Produced once per frame in which a face was tracked and consumed by
/// every detector in that tick; not retained afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Eye Aspect Ratio
    pub ear: f64,
    /// Mouth Aspect Ratio
    pub mar: f64,
    /// Iris center, normalized coordinates
    pub iris: (f64, f64),
    /// Monotonic capture timestamp (seconds)
    pub timestamp: f64,
    /// Time since the previous frame (seconds)
    pub delta_t: f64,
}

impl FrameSample {
    /// Build a sample from computed geometry metrics and clock readings
    pub fn from_metrics(metrics: FaceMetrics, timestamp: f64, delta_t: f64) -> Self {
        Self {
            ear: metrics.ear,
            mar: metrics.mar,
            iris: (metrics.iris.x, metrics.iris.y),
            timestamp,
            delta_t,
        }
    }
}

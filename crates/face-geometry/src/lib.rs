//! Face Geometry Metrics
//!
//! Pure per-frame geometry computed from face-mesh landmarks:
//! - Eye Aspect Ratio (EAR) for eye openness
//! - Mouth Aspect Ratio (MAR) for yawn detection
//! - Iris center position for saccadic velocity tracking
//!
//! All functions are stateless and deterministic; distances are Euclidean
//! in pixel space after scaling normalized coordinates by frame dimensions.

pub mod landmarks;
pub mod metrics;

pub use landmarks::{LandmarkSet, Point};
pub use metrics::{eye_aspect_ratio, iris_center, mouth_aspect_ratio, FaceMetrics};

use thiserror::Error;

/// Geometry error types
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Landmark index {0} out of range (set holds {1})")]
    LandmarkOutOfRange(usize, usize),

    #[error("Degenerate eye geometry: zero horizontal span")]
    DegenerateEye,
}

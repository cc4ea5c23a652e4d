//! Aspect ratio and iris metrics

use serde::{Deserialize, Serialize};

use crate::landmarks::{
    LandmarkSet, Point, LEFT_EYE_CORNERS, LEFT_EYE_VERTICAL, LEFT_IRIS_CENTER, MOUTH_CORNERS,
    MOUTH_VERTICAL, RIGHT_EYE_CORNERS, RIGHT_EYE_VERTICAL,
};
use crate::GeometryError;

/// Euclidean distance between two normalized points, in pixel space
pub fn pixel_distance(a: Point, b: Point, width: f64, height: f64) -> f64 {
    let dx = (a.x - b.x) * width;
    let dy = (a.y - b.y) * height;
    (dx * dx + dy * dy).sqrt()
}

fn index_distance(
    lm: &LandmarkSet,
    pair: (usize, usize),
    width: f64,
    height: f64,
) -> Result<f64, GeometryError> {
    Ok(pixel_distance(lm.get(pair.0)?, lm.get(pair.1)?, width, height))
}

fn single_eye_ratio(
    lm: &LandmarkSet,
    vertical: &[(usize, usize); 2],
    corners: (usize, usize),
    width: f64,
    height: f64,
) -> Result<f64, GeometryError> {
    let v1 = index_distance(lm, vertical[0], width, height)?;
    let v2 = index_distance(lm, vertical[1], width, height)?;
    let horizontal = index_distance(lm, corners, width, height)?;
    if horizontal == 0.0 {
        return Err(GeometryError::DegenerateEye);
    }
    Ok((v1 + v2) / (2.0 * horizontal))
}

/// Eye Aspect Ratio: mean of left and right eye ratios
///
/// Each eye contributes `(vertical_1 + vertical_2) / (2 * horizontal)`
/// over its fixed lid and corner landmark pairs. Lower values mean a more
/// closed eye.
pub fn eye_aspect_ratio(lm: &LandmarkSet, width: f64, height: f64) -> Result<f64, GeometryError> {
    let left = single_eye_ratio(lm, &LEFT_EYE_VERTICAL, LEFT_EYE_CORNERS, width, height)?;
    let right = single_eye_ratio(lm, &RIGHT_EYE_VERTICAL, RIGHT_EYE_CORNERS, width, height)?;
    Ok((left + right) / 2.0)
}

/// Mouth Aspect Ratio: mean vertical opening over mouth width
///
/// Returns 0.0 when the horizontal mouth distance is zero instead of
/// dividing by zero.
pub fn mouth_aspect_ratio(lm: &LandmarkSet, width: f64, height: f64) -> Result<f64, GeometryError> {
    let mut vertical_sum = 0.0;
    for pair in MOUTH_VERTICAL {
        vertical_sum += index_distance(lm, pair, width, height)?;
    }
    let vertical = vertical_sum / MOUTH_VERTICAL.len() as f64;
    let horizontal = index_distance(lm, MOUTH_CORNERS, width, height)?;
    if horizontal > 0.0 {
        Ok(vertical / horizontal)
    } else {
        Ok(0.0)
    }
}

/// Normalized coordinate of the left iris center landmark
pub fn iris_center(lm: &LandmarkSet) -> Result<Point, GeometryError> {
    lm.get(LEFT_IRIS_CENTER)
}

/// All geometry metrics for one tracked frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMetrics {
    /// Eye Aspect Ratio
    pub ear: f64,
    /// Mouth Aspect Ratio
    pub mar: f64,
    /// Iris center, normalized coordinates
    pub iris: Point,
}

impl FaceMetrics {
    /// Compute EAR, MAR, and iris position from one landmark set
    pub fn compute(lm: &LandmarkSet, width: f64, height: f64) -> Result<Self, GeometryError> {
        Ok(Self {
            ear: eye_aspect_ratio(lm, width, height)?,
            mar: mouth_aspect_ratio(lm, width, height)?,
            iris: iris_center(lm)?,
        })
    }
}

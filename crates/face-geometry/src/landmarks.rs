//! Landmark set and anatomical index scheme
//!
//! Indices follow the MediaPipe FaceMesh layout with refined landmarks
//! (478 points, iris centers at 468/473). Coordinates are normalized to
//! [0, 1] in both axes.

use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// Left eye vertical lid pairs (upper, lower)
pub const LEFT_EYE_VERTICAL: [(usize, usize); 2] = [(160, 144), (158, 153)];
/// Left eye corner pair (inner, outer)
pub const LEFT_EYE_CORNERS: (usize, usize) = (33, 133);

/// Right eye vertical lid pairs (upper, lower)
pub const RIGHT_EYE_VERTICAL: [(usize, usize); 2] = [(385, 380), (387, 373)];
/// Right eye corner pair (inner, outer)
pub const RIGHT_EYE_CORNERS: (usize, usize) = (362, 263);

/// Mouth vertical pairs (upper lip, lower lip)
pub const MOUTH_VERTICAL: [(usize, usize); 3] = [(13, 14), (81, 178), (311, 402)];
/// Mouth corner pair (left, right)
pub const MOUTH_CORNERS: (usize, usize) = (61, 291);

/// Left iris center landmark
pub const LEFT_IRIS_CENTER: usize = 468;

/// Number of points produced by the refined face mesh
pub const REFINED_MESH_POINTS: usize = 478;

/// Normalized 2D landmark coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One frame's tracked landmark coordinates, indexable by anatomical index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Create a landmark set from normalized points
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Number of points in the set
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a landmark by anatomical index
    pub fn get(&self, index: usize) -> Result<Point, GeometryError> {
        self.points
            .get(index)
            .copied()
            .ok_or(GeometryError::LandmarkOutOfRange(index, self.points.len()))
    }
}

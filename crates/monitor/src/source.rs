//! Landmark sources
//!
//! The tracker boundary: per tick, a landmark source supplies normalized
//! face-mesh coordinates plus frame dimensions and a monotonic timestamp.
//! A frame without a tracked face carries no landmarks and is skipped by
//! the runtime.

use face_geometry::landmarks::{
    LEFT_EYE_CORNERS, LEFT_EYE_VERTICAL, LEFT_IRIS_CENTER, MOUTH_CORNERS, MOUTH_VERTICAL,
    REFINED_MESH_POINTS, RIGHT_EYE_CORNERS, RIGHT_EYE_VERTICAL,
};
use face_geometry::{LandmarkSet, Point};

/// One captured frame from the tracker
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Tracked landmarks; `None` when no face was detected
    pub landmarks: Option<LandmarkSet>,
    /// Frame pixel width
    pub width: f64,
    /// Frame pixel height
    pub height: f64,
    /// Monotonic capture timestamp (seconds)
    pub timestamp: f64,
}

/// Supplier of captured frames at the tracker's frame rate
pub trait LandmarkSource {
    /// Next frame, or `None` when the stream has ended
    async fn next_frame(&mut self) -> Option<CapturedFrame>;
}

/// Replays a prepared frame sequence (tests and offline demos)
pub struct ScriptedSource {
    frames: std::vec::IntoIter<CapturedFrame>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<CapturedFrame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl LandmarkSource for ScriptedSource {
    async fn next_frame(&mut self) -> Option<CapturedFrame> {
        self.frames.next()
    }
}

/// Build a full refined-mesh landmark set with the given target metrics
///
/// Eye and mouth geometry are laid out on fixed 0.1-wide spans so that the
/// computed EAR/MAR equal the requested values on a square frame.
pub fn scripted_landmarks(ear: f64, mar: f64, iris: (f64, f64)) -> LandmarkSet {
    const SPAN: f64 = 0.1;
    let mut points = vec![Point::default(); REFINED_MESH_POINTS];

    let mut place_pair = |pair: (usize, usize), a: Point, b: Point| {
        points[pair.0] = a;
        points[pair.1] = b;
    };

    // Per-eye EAR is (v1 + v2) / (2 * h); equal vertical pairs of
    // ear * SPAN over an h of SPAN yield exactly `ear`.
    for (vertical, corners) in [
        (&LEFT_EYE_VERTICAL, LEFT_EYE_CORNERS),
        (&RIGHT_EYE_VERTICAL, RIGHT_EYE_CORNERS),
    ] {
        for pair in vertical.iter() {
            place_pair(
                *pair,
                Point::new(0.5, 0.4),
                Point::new(0.5, 0.4 + ear * SPAN),
            );
        }
        place_pair(corners, Point::new(0.45, 0.4), Point::new(0.45 + SPAN, 0.4));
    }

    for pair in MOUTH_VERTICAL {
        place_pair(
            pair,
            Point::new(0.5, 0.6),
            Point::new(0.5, 0.6 + mar * SPAN),
        );
    }
    place_pair(MOUTH_CORNERS, Point::new(0.45, 0.6), Point::new(0.45 + SPAN, 0.6));

    points[LEFT_IRIS_CENTER] = Point::new(iris.0, iris.1);
    LandmarkSet::new(points)
}

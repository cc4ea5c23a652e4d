//! Blink detection
//!
//! Hysteresis state machine over EAR: the eye enters `closed` below the
//! close threshold and only completes a blink once EAR rises strictly
//! above the open threshold. Values between the thresholds are a dead
//! zone where the state holds, which keeps noisy per-frame EAR from
//! toggling at the boundary.

use crate::calibration::CalibrationProfile;
use crate::sample::FrameSample;

/// Blink detector state, reset after every completed blink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkState {
    pub is_closed: bool,
    /// Lowest EAR seen during the current closure
    pub min_ear_in_closure: f64,
}

impl Default for BlinkState {
    fn default() -> Self {
        Self {
            is_closed: false,
            min_ear_in_closure: 1.0,
        }
    }
}

/// A closed-then-reopened eye cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedBlink {
    /// The eye never closed deeply enough for a deliberate blink
    pub incomplete: bool,
}

/// Per-frame blink detector output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkTick {
    /// The eye was classified closed on this frame
    pub closed_frame: bool,
    pub completed: Option<CompletedBlink>,
}

/// Advance the blink state machine by one frame
///
/// `incomplete_depth_ratio` scales the close threshold to form the
/// full-closure depth requirement; a closure whose minimum EAR stays above
/// it is classified incomplete (partial closure or squint).
pub fn update(
    state: &mut BlinkState,
    sample: &FrameSample,
    profile: &CalibrationProfile,
    incomplete_depth_ratio: f64,
) -> BlinkTick {
    if sample.ear < profile.close_threshold {
        if state.is_closed {
            state.min_ear_in_closure = state.min_ear_in_closure.min(sample.ear);
        } else {
            state.is_closed = true;
            state.min_ear_in_closure = sample.ear;
        }
        return BlinkTick {
            closed_frame: true,
            completed: None,
        };
    }

    if sample.ear > profile.open_threshold && state.is_closed {
        let incomplete =
            state.min_ear_in_closure > profile.close_threshold * incomplete_depth_ratio;
        *state = BlinkState::default();
        return BlinkTick {
            closed_frame: false,
            completed: Some(CompletedBlink { incomplete }),
        };
    }

    // Dead zone between thresholds: hold current state
    BlinkTick {
        closed_frame: false,
        completed: None,
    }
}

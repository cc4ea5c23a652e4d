//! Iris displacement tracking
//!
//! Accumulates per-frame iris center displacement as a proxy for saccadic
//! activity; low average displacement correlates with reduced ocular
//! engagement. The first frame of a session has no previous position and
//! contributes nothing.

use crate::sample::FrameSample;

/// Iris tracker state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IrisState {
    pub prev: Option<(f64, f64)>,
}

/// Advance the tracker; returns the displacement since the previous frame
pub fn update(state: &mut IrisState, sample: &FrameSample) -> Option<f64> {
    let displacement = state.prev.map(|(px, py)| {
        let dx = sample.iris.0 - px;
        let dy = sample.iris.1 - py;
        (dx * dx + dy * dy).sqrt()
    });
    state.prev = Some(sample.iris);
    displacement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(iris: (f64, f64), timestamp: f64) -> FrameSample {
        FrameSample {
            ear: 0.3,
            mar: 0.1,
            iris,
            timestamp,
            delta_t: 1.0 / 30.0,
        }
    }

    #[test]
    fn test_first_frame_contributes_nothing() {
        let mut state = IrisState::default();
        assert!(update(&mut state, &sample((0.5, 0.5), 0.0)).is_none());
    }

    #[test]
    fn test_displacement_is_euclidean() {
        let mut state = IrisState::default();
        update(&mut state, &sample((0.5, 0.5), 0.0));
        let d = update(&mut state, &sample((0.53, 0.54), 0.1)).unwrap();
        assert!((d - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_stationary_iris_zero_displacement() {
        let mut state = IrisState::default();
        update(&mut state, &sample((0.5, 0.5), 0.0));
        assert_eq!(update(&mut state, &sample((0.5, 0.5), 0.1)), Some(0.0));
    }
}

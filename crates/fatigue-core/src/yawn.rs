//! Yawn detection
//!
//! Mouth open/closed state machine over MAR. A yawn counts only when the
//! mouth stayed open longer than the minimum duration, which filters out
//! speech and coughing. Duration is measured on the session clock, not in
//! frames, so it stays correct under variable frame rate.

use crate::sample::FrameSample;

/// Yawn detector state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YawnState {
    pub is_open: bool,
    /// Session clock reading when the mouth opened
    pub open_since: f64,
}

/// A mouth-open excursion that lasted long enough to count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedYawn {
    /// How long the mouth stayed open (seconds)
    pub duration: f64,
}

/// Advance the yawn state machine by one frame
pub fn update(
    state: &mut YawnState,
    sample: &FrameSample,
    yawn_threshold: f64,
    min_yawn_secs: f64,
) -> Option<CompletedYawn> {
    if sample.mar > yawn_threshold {
        if !state.is_open {
            state.is_open = true;
            state.open_since = sample.timestamp;
        }
        return None;
    }

    if !state.is_open {
        return None;
    }

    state.is_open = false;
    let duration = sample.timestamp - state.open_since;
    (duration > min_yawn_secs).then_some(CompletedYawn { duration })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(mar: f64, timestamp: f64) -> FrameSample {
        FrameSample {
            ear: 0.3,
            mar,
            iris: (0.5, 0.5),
            timestamp,
            delta_t: 1.0 / 30.0,
        }
    }

    #[test]
    fn test_long_opening_counts() {
        let mut state = YawnState::default();
        assert!(update(&mut state, &sample(0.8, 0.0), 0.5, 1.5).is_none());
        assert!(update(&mut state, &sample(0.8, 1.0), 0.5, 1.5).is_none());
        let yawn = update(&mut state, &sample(0.2, 2.0), 0.5, 1.5).unwrap();
        assert!((yawn.duration - 2.0).abs() < 1e-9);
        assert!(!state.is_open);
    }

    #[test]
    fn test_short_opening_filtered() {
        let mut state = YawnState::default();
        // 1.0s above threshold: speech, not a yawn
        update(&mut state, &sample(0.8, 0.0), 0.5, 1.5);
        assert!(update(&mut state, &sample(0.2, 1.0), 0.5, 1.5).is_none());
    }

    #[test]
    fn test_exact_minimum_duration_filtered() {
        let mut state = YawnState::default();
        // Gate is strict: exactly 1.5s does not count
        update(&mut state, &sample(0.8, 0.0), 0.5, 1.5);
        assert!(update(&mut state, &sample(0.2, 1.5), 0.5, 1.5).is_none());
    }

    #[test]
    fn test_closed_mouth_stays_idle() {
        let mut state = YawnState::default();
        assert!(update(&mut state, &sample(0.1, 0.0), 0.5, 1.5).is_none());
        assert!(!state.is_open);
    }

    #[test]
    fn test_open_entry_timestamp_not_refreshed() {
        let mut state = YawnState::default();
        update(&mut state, &sample(0.8, 0.0), 0.5, 1.5);
        update(&mut state, &sample(0.9, 1.0), 0.5, 1.5);
        assert_eq!(state.open_since, 0.0);
    }
}

//! Composite fatigue scoring
//!
//! A pure function of an accumulator snapshot. Each condition that holds
//! adds its configured weight and records a reason; the verdict is
//! fatigued once the composite score reaches the configured threshold.
//! Recomputing on an identical snapshot yields an identical verdict.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::session::SessionAccumulators;

/// Why a fatigue verdict scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueReason {
    /// Eyes closed for too large a share of frames
    HighPerclos,
    /// Too few blinks over a meaningful window
    ScarceBlinking,
    /// Too many closures never reached full depth
    IncompleteBlinks,
    /// At least one yawn observed
    Yawning,
    /// Average iris displacement below the engagement floor
    LowSaccadicActivity,
    /// Accumulated eyelid closure time too high
    ProlongedClosure,
    /// Went too long without a completed blink
    LongInterblinkGap,
    /// Subjective self-report at session end
    HighSelfReport,
}

impl FatigueReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FatigueReason::HighPerclos => "high_perclos",
            FatigueReason::ScarceBlinking => "scarce_blinking",
            FatigueReason::IncompleteBlinks => "incomplete_blinks",
            FatigueReason::Yawning => "yawning",
            FatigueReason::LowSaccadicActivity => "low_saccadic_activity",
            FatigueReason::ProlongedClosure => "prolonged_closure",
            FatigueReason::LongInterblinkGap => "long_interblink_gap",
            FatigueReason::HighSelfReport => "high_self_report",
        }
    }
}

impl std::fmt::Display for FatigueReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite scoring result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueVerdict {
    /// Weighted composite score
    pub score: u32,
    pub is_fatigued: bool,
    /// Conditions that contributed, in weight-table order
    pub reasons: Vec<FatigueReason>,
}

/// Score one accumulator snapshot
///
/// `self_report` is the 1-9 subjective rating collected at session end;
/// pass `None` during live monitoring.
pub fn score(
    acc: &SessionAccumulators,
    self_report: Option<u8>,
    cfg: &ScoringConfig,
) -> FatigueVerdict {
    let mut total = 0u32;
    let mut reasons = Vec::new();
    let mut add = |weight: u32, reason: FatigueReason| {
        total += weight;
        reasons.push(reason);
    };

    if acc.perclos() >= cfg.perclos_threshold_pct {
        add(cfg.perclos_weight, FatigueReason::HighPerclos);
    }
    if acc.blink_count <= cfg.scarce_blink_max && acc.frames_total > cfg.scarce_blink_min_frames {
        add(cfg.scarce_blink_weight, FatigueReason::ScarceBlinking);
    }
    if acc.pct_incomplete() >= cfg.incomplete_threshold_pct {
        add(cfg.incomplete_weight, FatigueReason::IncompleteBlinks);
    }
    if acc.yawn_count >= 1 {
        add(cfg.yawn_weight, FatigueReason::Yawning);
    }
    if acc.avg_iris_velocity(cfg.min_iris_samples) < cfg.velocity_floor {
        add(cfg.velocity_weight, FatigueReason::LowSaccadicActivity);
    }
    if acc.accumulated_closure_time >= cfg.closure_threshold_secs {
        add(cfg.closure_weight, FatigueReason::ProlongedClosure);
    }
    if acc.max_interblink_gap >= cfg.interblink_gap_secs {
        add(cfg.interblink_gap_weight, FatigueReason::LongInterblinkGap);
    }
    if self_report.is_some_and(|r| r >= cfg.self_report_min) {
        add(cfg.self_report_weight, FatigueReason::HighSelfReport);
    }

    FatigueVerdict {
        score: total,
        is_fatigued: total >= cfg.fatigue_score,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Accumulators describing an alert, engaged operator
    fn healthy() -> SessionAccumulators {
        SessionAccumulators {
            frames_total: 100,
            frames_closed: 5,
            blink_count: 20,
            incomplete_blink_count: 0,
            yawn_count: 0,
            accumulated_closure_time: 0.5,
            total_iris_distance: 0.1,
            iris_sample_count: 100,
            max_interblink_gap: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_operator_not_fatigued() {
        let verdict = score(&healthy(), None, &ScoringConfig::default());
        assert_eq!(verdict.score, 0);
        assert!(!verdict.is_fatigued);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_perclos_alone_reaches_verdict() {
        // perclos 28, blink_count 10, no other contributors
        let acc = SessionAccumulators {
            frames_total: 100,
            frames_closed: 28,
            blink_count: 10,
            total_iris_distance: 0.05,
            iris_sample_count: 100,
            ..Default::default()
        };
        let verdict = score(&acc, None, &ScoringConfig::default());
        assert_eq!(verdict.score, 3);
        assert!(verdict.is_fatigued);
        assert_eq!(verdict.reasons, vec![FatigueReason::HighPerclos]);
    }

    #[test]
    fn test_scarce_blinking_requires_meaningful_window() {
        let mut acc = healthy();
        acc.blink_count = 2;
        acc.frames_total = 60;
        // Exactly 60 frames is not yet a meaningful window
        assert_eq!(score(&acc, None, &ScoringConfig::default()).score, 0);

        acc.frames_total = 61;
        let verdict = score(&acc, None, &ScoringConfig::default());
        assert_eq!(verdict.score, 3);
        assert_eq!(verdict.reasons, vec![FatigueReason::ScarceBlinking]);
    }

    #[test]
    fn test_all_conditions_sum() {
        let acc = SessionAccumulators {
            frames_total: 100,
            frames_closed: 40,
            blink_count: 4,
            incomplete_blink_count: 2,
            yawn_count: 1,
            accumulated_closure_time: 4.0,
            total_iris_distance: 0.0001,
            iris_sample_count: 50,
            max_interblink_gap: 12.0,
            ..Default::default()
        };
        let verdict = score(&acc, Some(8), &ScoringConfig::default());
        // 3 + 3 + 2 + 1 + 1 + 1 + 2 + 1
        assert_eq!(verdict.score, 14);
        assert!(verdict.is_fatigued);
        assert_eq!(verdict.reasons.len(), 8);
    }

    #[test]
    fn test_self_report_only_counts_at_threshold() {
        let acc = healthy();
        let cfg = ScoringConfig::default();
        assert_eq!(score(&acc, Some(6), &cfg).score, 0);
        assert_eq!(score(&acc, Some(7), &cfg).score, 1);
        assert_eq!(
            score(&acc, Some(9), &cfg).reasons,
            vec![FatigueReason::HighSelfReport]
        );
    }

    #[test]
    fn test_velocity_floor_with_too_few_samples() {
        // Fewer than min_iris_samples: average velocity suppressed to 0,
        // which is below the floor and counts as low saccadic activity.
        let mut acc = healthy();
        acc.iris_sample_count = 3;
        acc.total_iris_distance = 10.0;
        let verdict = score(&acc, None, &ScoringConfig::default());
        assert_eq!(verdict.reasons, vec![FatigueReason::LowSaccadicActivity]);
    }

    #[test]
    fn test_empty_accumulators_guarded() {
        let acc = SessionAccumulators::default();
        let verdict = score(&acc, None, &ScoringConfig::default());
        // Only the zero-velocity condition can hold on an empty session
        assert_eq!(verdict.reasons, vec![FatigueReason::LowSaccadicActivity]);
        assert_eq!(verdict.score, 1);
        assert!(!verdict.is_fatigued);
    }

    proptest! {
        #[test]
        fn prop_scorer_idempotent(
            frames_total in 0u64..10_000,
            frames_closed in 0u64..10_000,
            blink_count in 0u32..500,
            incomplete in 0u32..500,
            yawns in 0u32..20,
            closure in 0.0f64..100.0,
            iris_dist in 0.0f64..5.0,
            iris_samples in 0u64..10_000,
            gap in 0.0f64..120.0,
            report in proptest::option::of(1u8..=9),
        ) {
            let acc = SessionAccumulators {
                frames_total,
                frames_closed: frames_closed.min(frames_total),
                blink_count,
                incomplete_blink_count: incomplete.min(blink_count),
                yawn_count: yawns,
                accumulated_closure_time: closure,
                total_iris_distance: iris_dist,
                iris_sample_count: iris_samples,
                max_interblink_gap: gap,
                ..Default::default()
            };
            let cfg = ScoringConfig::default();
            let a = score(&acc, report, &cfg);
            let b = score(&acc, report, &cfg);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.is_fatigued, a.score >= cfg.fatigue_score);
            // Sum of all weights bounds the score
            prop_assert!(a.score <= 14);
        }

        #[test]
        fn prop_perclos_bounded(
            frames_total in 0u64..10_000,
            frames_closed in 0u64..10_000,
        ) {
            let acc = SessionAccumulators {
                frames_total,
                frames_closed: frames_closed.min(frames_total),
                ..Default::default()
            };
            let p = acc.perclos();
            prop_assert!((0.0..=100.0).contains(&p));
        }
    }
}

//! Session aggregator
//!
//! Owns all cross-frame state for one monitoring session: the calibration
//! profile, the three detector states, the accumulators, and the alert
//! gate. Ticks are strictly ordered; each frame's detectors run to
//! completion before the next frame is consumed. Snapshots are owned
//! copies, so persistence can run concurrently without touching live
//! state.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alert::{AlertGate, AlertSeverity, FiredAlert};
use crate::blink::{self, BlinkState};
use crate::calibration::CalibrationProfile;
use crate::config::FatigueConfig;
use crate::iris::{self, IrisState};
use crate::sample::FrameSample;
use crate::scorer::{score, FatigueVerdict};
use crate::yawn::{self, YawnState};

/// One alert occurrence in the session timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueMoment {
    /// Seconds into the monitoring phase, rounded
    pub elapsed_seconds: u64,
    /// Severity tag ("moderate" or "severe")
    pub reason: String,
}

/// Monotonically-updated session counters
///
/// Owned exclusively by the session; mutated only inside the per-frame
/// tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAccumulators {
    pub frames_total: u64,
    pub frames_closed: u64,
    pub blink_count: u32,
    pub incomplete_blink_count: u32,
    pub yawn_count: u32,
    /// Total eyelid closure time (seconds)
    pub accumulated_closure_time: f64,
    /// Sum of per-frame iris displacements (normalized units)
    pub total_iris_distance: f64,
    pub iris_sample_count: u64,
    /// Longest observed time between completed blinks (seconds)
    pub max_interblink_gap: f64,
    pub alerts_fired: u32,
    pub fatigue_moments: Vec<FatigueMoment>,
}

impl SessionAccumulators {
    /// Percentage of frames with the eye classified closed, in [0, 100]
    pub fn perclos(&self) -> f64 {
        if self.frames_total == 0 {
            return 0.0;
        }
        self.frames_closed as f64 / self.frames_total as f64 * 100.0
    }

    /// Percentage of blinks classified incomplete
    pub fn pct_incomplete(&self) -> f64 {
        if self.blink_count == 0 {
            return 0.0;
        }
        self.incomplete_blink_count as f64 / self.blink_count as f64 * 100.0
    }

    /// Average per-frame iris displacement, scaled by 100
    ///
    /// Suppressed to 0 until more than `min_samples` displacements exist,
    /// since a handful of samples is mostly tracker noise.
    pub fn avg_iris_velocity(&self, min_samples: u64) -> f64 {
        if self.iris_sample_count > min_samples {
            self.total_iris_distance / self.iris_sample_count as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Completed blinks per minute over the given elapsed time
    pub fn blink_rate_per_min(&self, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.blink_count as f64 / (elapsed_secs / 60.0)
    }
}

/// Periodic metric snapshot pushed to the session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub elapsed_seconds: u64,
    pub perclos: f64,
    pub blink_rate_per_min: f64,
    pub pct_incomplete: f64,
    pub num_yawns: u32,
    pub closure_time_seconds: f64,
    pub avg_iris_velocity: f64,
    pub max_interblink_gap: f64,
    pub alerts_fired: u32,
    pub fatigue_moments: Vec<FatigueMoment>,
    pub is_fatigued: bool,
}

/// Final session report: the last snapshot plus end-of-session fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub metrics: MetricsSnapshot,
    /// Subjective self-report on a 1-9 scale, if collected
    pub self_report: Option<u8>,
    pub total_duration_seconds: u64,
}

/// Per-tick output for the presentation layer
///
/// Read-only observations; never fed back into the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub blink_count: u32,
    pub yawn_count: u32,
    pub perclos: f64,
    pub verdict: FatigueVerdict,
    pub alert: Option<FiredAlert>,
}

/// One monitoring session's complete state
pub struct FatigueSession {
    profile: CalibrationProfile,
    config: FatigueConfig,
    acc: SessionAccumulators,
    blink: BlinkState,
    yawn: YawnState,
    iris: IrisState,
    gate: AlertGate,
    started_at: f64,
    last_blink_at: f64,
}

impl FatigueSession {
    /// Start monitoring at the given session clock reading
    pub fn new(profile: CalibrationProfile, config: FatigueConfig, now: f64) -> Self {
        let gate = AlertGate::new(config.alert.cooldown_secs);
        Self {
            profile,
            config,
            acc: SessionAccumulators::default(),
            blink: BlinkState::default(),
            yawn: YawnState::default(),
            iris: IrisState::default(),
            gate,
            started_at: now,
            last_blink_at: now,
        }
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    pub fn accumulators(&self) -> &SessionAccumulators {
        &self.acc
    }

    pub fn elapsed_secs(&self, now: f64) -> f64 {
        now - self.started_at
    }

    /// Consume one frame's sample: detectors, scorer, alert gate
    pub fn tick(&mut self, sample: &FrameSample) -> TickOutput {
        let now = sample.timestamp;
        self.acc.frames_total += 1;

        let blink_tick = blink::update(
            &mut self.blink,
            sample,
            &self.profile,
            self.config.detector.incomplete_depth_ratio,
        );
        if blink_tick.closed_frame {
            self.acc.frames_closed += 1;
            self.acc.accumulated_closure_time += sample.delta_t;
        }
        if let Some(completed) = blink_tick.completed {
            self.acc.blink_count += 1;
            if completed.incomplete {
                self.acc.incomplete_blink_count += 1;
            }
            self.last_blink_at = now;
        }

        // Interblink gap grows every frame until the next completed blink
        let gap = now - self.last_blink_at;
        if gap > self.acc.max_interblink_gap {
            self.acc.max_interblink_gap = gap;
        }

        if let Some(completed) = yawn::update(
            &mut self.yawn,
            sample,
            self.profile.yawn_threshold,
            self.config.detector.min_yawn_secs,
        ) {
            self.acc.yawn_count += 1;
            debug!(duration = completed.duration, "Yawn counted");
        }

        if let Some(displacement) = iris::update(&mut self.iris, sample) {
            self.acc.total_iris_distance += displacement;
            self.acc.iris_sample_count += 1;
        }

        let verdict = score(&self.acc, None, &self.config.scoring);
        let alert = if verdict.is_fatigued && self.gate.should_fire(now) {
            Some(self.fire_alert(now, &verdict))
        } else {
            None
        };

        TickOutput {
            blink_count: self.acc.blink_count,
            yawn_count: self.acc.yawn_count,
            perclos: self.acc.perclos(),
            verdict,
            alert,
        }
    }

    fn fire_alert(&mut self, now: f64, verdict: &FatigueVerdict) -> FiredAlert {
        self.gate.record_fire(now);
        self.acc.alerts_fired += 1;

        let severity = if verdict.score >= self.config.scoring.severe_score {
            AlertSeverity::Severe
        } else {
            AlertSeverity::Moderate
        };
        self.acc.fatigue_moments.push(FatigueMoment {
            elapsed_seconds: self.elapsed_secs(now).round() as u64,
            reason: severity.as_str().to_string(),
        });

        warn!(
            score = verdict.score,
            severity = severity.as_str(),
            alerts_fired = self.acc.alerts_fired,
            "Fatigue alert fired"
        );

        FiredAlert {
            severity,
            score: verdict.score,
        }
    }

    /// Owned metric snapshot at the given clock reading
    pub fn snapshot(&self, now: f64) -> MetricsSnapshot {
        let elapsed = self.elapsed_secs(now);
        let verdict = score(&self.acc, None, &self.config.scoring);
        MetricsSnapshot {
            elapsed_seconds: elapsed.round() as u64,
            perclos: self.acc.perclos(),
            blink_rate_per_min: self.acc.blink_rate_per_min(elapsed),
            pct_incomplete: self.acc.pct_incomplete(),
            num_yawns: self.acc.yawn_count,
            closure_time_seconds: self.acc.accumulated_closure_time,
            avg_iris_velocity: self
                .acc
                .avg_iris_velocity(self.config.scoring.min_iris_samples),
            max_interblink_gap: self.acc.max_interblink_gap,
            alerts_fired: self.acc.alerts_fired,
            fatigue_moments: self.acc.fatigue_moments.clone(),
            is_fatigued: verdict.is_fatigued,
        }
    }

    /// Final report including the subjective self-report contribution
    ///
    /// A session ending while the eye is still closed does not count a
    /// trailing blink; only fully closed-then-reopened cycles were
    /// counted during ticks.
    pub fn final_report(&self, now: f64, self_report: Option<u8>) -> FinalReport {
        let mut metrics = self.snapshot(now);
        let verdict = score(&self.acc, self_report, &self.config.scoring);
        metrics.is_fatigued = verdict.is_fatigued;
        FinalReport {
            metrics,
            self_report,
            total_duration_seconds: self.elapsed_secs(now).round() as u64,
        }
    }
}

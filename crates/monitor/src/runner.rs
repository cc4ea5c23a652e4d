//! Monitor runtime
//!
//! One session = one sequential worker: every frame's tick (metrics,
//! detectors, scorer, alert gate) runs to completion before the next
//! frame is consumed, because the detectors carry state forward between
//! ticks. Snapshot pushes run on spawned tasks against owned copies and
//! never touch live session state. A stop request is honored only at a
//! tick boundary, and the final report is flushed exactly once.

use std::sync::Arc;

use face_geometry::FaceMetrics;
use fatigue_core::{
    CalibrationProfile, Calibrator, FatigueSession, FinalReport, FrameSample,
};
use session_store::SessionRepository;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::settings::MonitorSettings;
use crate::source::{CapturedFrame, LandmarkSource};
use crate::MonitorError;

/// Request to end the session at the next tick boundary
#[derive(Debug, Clone, Copy, Default)]
pub struct StopRequest {
    /// Subjective self-report (1-9) collected at session end, if any
    pub self_report: Option<u8>,
}

/// Read-only observations for the presentation layer
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Calibration countdown
    CalibrationProgress { remaining_secs: f64 },
    /// Calibration finished; monitoring begins
    CalibrationComplete { profile: CalibrationProfile },
    /// Per-tick counters
    Readout {
        blink_count: u32,
        yawn_count: u32,
        perclos: f64,
    },
    /// A fatigue alert passed the cooldown gate
    Alert {
        severity: String,
        score: u32,
        reasons: Vec<String>,
    },
    /// A snapshot push failed; local state remains authoritative
    StoreError { message: String },
}

/// What a finished session produced
#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    /// `None` when the session ended before calibration completed
    pub report: Option<FinalReport>,
}

/// The per-session tick worker
pub struct MonitorRuntime {
    settings: MonitorSettings,
    repository: Arc<SessionRepository>,
    events: mpsc::Sender<MonitorEvent>,
}

impl MonitorRuntime {
    pub fn new(
        settings: MonitorSettings,
        repository: Arc<SessionRepository>,
        events: mpsc::Sender<MonitorEvent>,
    ) -> Self {
        Self {
            settings,
            repository,
            events,
        }
    }

    /// Drive a session from calibration through final flush
    ///
    /// Runs until the source ends or a stop request arrives; either way
    /// the final report is flushed to the repository exactly once.
    pub async fn run<S: LandmarkSource>(
        &self,
        source: &mut S,
        mut stop: watch::Receiver<Option<StopRequest>>,
    ) -> Result<SessionOutcome, MonitorError> {
        let session_id = self.repository.create_session()?;
        info!(session_id = %session_id, "Monitor worker started");

        let mut calibrator = Calibrator::new(self.settings.fatigue.calibration.clone());
        let mut session: Option<FatigueSession> = None;
        let mut last_frame_time: Option<f64> = None;
        let mut last_snapshot_at = 0.0;
        let mut clock = 0.0;
        let mut stop_request = None;

        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if let Some(request) = *stop.borrow() {
                        stop_request = Some(request);
                        break;
                    }
                }
                frame = source.next_frame() => {
                    let Some(frame) = frame else { break };
                    clock = frame.timestamp;
                    self.process_frame(
                        frame,
                        session_id,
                        &mut calibrator,
                        &mut session,
                        &mut last_frame_time,
                        &mut last_snapshot_at,
                    );
                }
            }
        }

        let self_report = stop_request.and_then(|r| r.self_report);
        let report = session.map(|s| s.final_report(clock, self_report));
        if let Some(report) = &report {
            if let Err(e) = self.repository.insert_final(session_id, report.clone()) {
                warn!(session_id = %session_id, error = %e, "Final flush failed");
                let _ = self.events.try_send(MonitorEvent::StoreError {
                    message: e.to_string(),
                });
            }
        }
        info!(session_id = %session_id, "Monitor worker stopped");

        Ok(SessionOutcome { session_id, report })
    }

    fn process_frame(
        &self,
        frame: CapturedFrame,
        session_id: Uuid,
        calibrator: &mut Calibrator,
        session: &mut Option<FatigueSession>,
        last_frame_time: &mut Option<f64>,
        last_snapshot_at: &mut f64,
    ) {
        let now = frame.timestamp;
        let delta_t = last_frame_time.map_or(0.0, |last| now - last);
        *last_frame_time = Some(now);

        // No tracked face: the whole tick is skipped, never zero-valued
        let Some(landmarks) = frame.landmarks else {
            return;
        };

        let metrics = match FaceMetrics::compute(&landmarks, frame.width, frame.height) {
            Ok(metrics) => metrics,
            Err(e) => {
                debug!(error = %e, "Unusable landmark frame skipped");
                return;
            }
        };
        let sample = FrameSample::from_metrics(metrics, now, delta_t);

        match session {
            None => {
                if calibrator.phase() == fatigue_core::CalibrationPhase::NotStarted {
                    calibrator.begin(now);
                }
                let _ = self.events.try_send(MonitorEvent::CalibrationProgress {
                    remaining_secs: calibrator.remaining_secs(now),
                });
                if let Some(profile) = calibrator.observe(&sample) {
                    let _ = self
                        .events
                        .try_send(MonitorEvent::CalibrationComplete { profile });
                    *session = Some(FatigueSession::new(
                        profile,
                        self.settings.fatigue.clone(),
                        now,
                    ));
                    *last_snapshot_at = now;
                }
            }
            Some(active) => {
                let out = active.tick(&sample);

                let _ = self.events.try_send(MonitorEvent::Readout {
                    blink_count: out.blink_count,
                    yawn_count: out.yawn_count,
                    perclos: out.perclos,
                });

                if let Some(alert) = out.alert {
                    let _ = self.events.try_send(MonitorEvent::Alert {
                        severity: alert.severity.to_string(),
                        score: alert.score,
                        reasons: out
                            .verdict
                            .reasons
                            .iter()
                            .map(|r| r.to_string())
                            .collect(),
                    });
                }

                if now - *last_snapshot_at >= self.settings.snapshot_interval_secs {
                    *last_snapshot_at = now;
                    self.push_snapshot(session_id, active.snapshot(now));
                }
            }
        }
    }

    /// Fire-and-forget snapshot push; the tick loop never waits on it
    fn push_snapshot(&self, session_id: Uuid, snapshot: fatigue_core::MetricsSnapshot) {
        let repository = Arc::clone(&self.repository);
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(e) = repository.insert_snapshot(session_id, snapshot) {
                warn!(session_id = %session_id, error = %e, "Snapshot push failed");
                let _ = events.try_send(MonitorEvent::StoreError {
                    message: e.to_string(),
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{scripted_landmarks, ScriptedSource};

    fn frame(ear: f64, mar: f64, iris: (f64, f64), timestamp: f64) -> CapturedFrame {
        CapturedFrame {
            landmarks: Some(scripted_landmarks(ear, mar, iris)),
            width: 640.0,
            height: 640.0,
            timestamp,
        }
    }

    fn empty_frame(timestamp: f64) -> CapturedFrame {
        CapturedFrame {
            landmarks: None,
            width: 640.0,
            height: 640.0,
            timestamp,
        }
    }

    /// 10s of steady open-eye frames at 10 fps completes calibration
    fn calibration_script() -> Vec<CapturedFrame> {
        (0..=100)
            .map(|i| frame(0.30, 0.1, (0.5, 0.5), i as f64 * 0.1))
            .collect()
    }

    fn runtime(repo: Arc<SessionRepository>) -> (MonitorRuntime, mpsc::Receiver<MonitorEvent>) {
        let (tx, rx) = mpsc::channel(1024);
        (MonitorRuntime::new(MonitorSettings::default(), repo, tx), rx)
    }

    fn never_stop() -> watch::Receiver<Option<StopRequest>> {
        let (tx, rx) = watch::channel(None);
        // Keep the sender alive for the whole test
        std::mem::forget(tx);
        rx
    }

    async fn drain(rx: &mut mpsc::Receiver<MonitorEvent>) -> Vec<MonitorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_calibration_then_monitoring() {
        let repo = Arc::new(SessionRepository::new());
        let (runtime, mut rx) = runtime(Arc::clone(&repo));

        let mut script = calibration_script();
        // A blink after calibration completes
        script.push(frame(0.10, 0.1, (0.5, 0.5), 10.1));
        script.push(frame(0.30, 0.1, (0.5, 0.5), 10.2));
        let mut source = ScriptedSource::new(script);

        let outcome = runtime.run(&mut source, never_stop()).await.unwrap();
        let report = outcome.report.unwrap();
        assert!(!report.metrics.is_fatigued);

        let events = drain(&mut rx).await;
        assert!(events
            .iter()
            .any(|e| matches!(e, MonitorEvent::CalibrationComplete { .. })));
        let last_readout = events.iter().rev().find_map(|e| match e {
            MonitorEvent::Readout { blink_count, .. } => Some(*blink_count),
            _ => None,
        });
        assert_eq!(last_readout, Some(1));
    }

    #[tokio::test]
    async fn test_no_face_frames_mutate_nothing() {
        let repo = Arc::new(SessionRepository::new());
        let (runtime, _rx) = runtime(Arc::clone(&repo));

        let mut script = calibration_script();
        // Tracker loses the face for a stretch
        for i in 0..20 {
            script.push(empty_frame(10.1 + i as f64 * 0.1));
        }
        script.push(frame(0.30, 0.1, (0.5, 0.5), 12.2));
        let mut source = ScriptedSource::new(script);

        let outcome = runtime.run(&mut source, never_stop()).await.unwrap();
        let report = outcome.report.unwrap();
        // Only a single monitored frame: gaps contributed no closed
        // frames, no closure time, no iris samples
        assert_eq!(report.metrics.closure_time_seconds, 0.0);
        assert_eq!(report.metrics.num_yawns, 0);
    }

    #[tokio::test]
    async fn test_periodic_snapshots_pushed() {
        let repo = Arc::new(SessionRepository::new());
        let (runtime, _rx) = runtime(Arc::clone(&repo));

        let mut script = calibration_script();
        // 16 more seconds of monitoring at 10 fps: pushes at ~15s and ~20s
        for i in 1..=160 {
            script.push(frame(0.30, 0.1, (0.5, 0.5), 10.0 + i as f64 * 0.1));
        }
        let mut source = ScriptedSource::new(script);

        let outcome = runtime.run(&mut source, never_stop()).await.unwrap();
        // Let spawned pushes land
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let snapshots = repo.get_snapshots(outcome.session_id).unwrap();
        assert_eq!(snapshots.len(), 3);
    }

    #[tokio::test]
    async fn test_final_report_flushed_exactly_once() {
        let repo = Arc::new(SessionRepository::new());
        let (runtime, _rx) = runtime(Arc::clone(&repo));

        let mut source = ScriptedSource::new(calibration_script());
        let outcome = runtime.run(&mut source, never_stop()).await.unwrap();

        let stored = repo.get_final(outcome.session_id).unwrap().unwrap();
        assert_eq!(
            stored.report.total_duration_seconds,
            outcome.report.unwrap().total_duration_seconds
        );
    }

    #[tokio::test]
    async fn test_stop_request_carries_self_report() {
        let repo = Arc::new(SessionRepository::new());
        let (runtime, _rx) = runtime(Arc::clone(&repo));
        let (stop_tx, stop_rx) = watch::channel(None);

        // Stop is already requested; the first select iteration may take
        // either branch, but the worker must exit at a tick boundary and
        // still flush.
        stop_tx
            .send(Some(StopRequest {
                self_report: Some(8),
            }))
            .unwrap();

        let mut source = ScriptedSource::new(calibration_script());
        let outcome = runtime.run(&mut source, stop_rx).await.unwrap();

        if let Some(report) = outcome.report {
            assert_eq!(report.self_report, Some(8));
        }
    }

    #[tokio::test]
    async fn test_stop_during_calibration_yields_no_report() {
        let repo = Arc::new(SessionRepository::new());
        let (runtime, _rx) = runtime(Arc::clone(&repo));

        // Stream ends mid-calibration
        let script: Vec<_> = (0..10)
            .map(|i| frame(0.30, 0.1, (0.5, 0.5), i as f64 * 0.1))
            .collect();
        let mut source = ScriptedSource::new(script);

        let outcome = runtime.run(&mut source, never_stop()).await.unwrap();
        assert!(outcome.report.is_none());
        assert!(repo.get_final(outcome.session_id).unwrap().is_none());
    }
}

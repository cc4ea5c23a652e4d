//! VigilEye Fatigue Monitor - Main Entry Point

use std::sync::Arc;

use monitor::{
    init_logging, scripted_landmarks, CapturedFrame, MonitorEvent, MonitorRuntime,
    MonitorSettings, ScriptedSource, StopRequest,
};
use session_store::SessionRepository;
use tokio::sync::{mpsc, watch};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== VigilEye Fatigue Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Running scripted demo session...");

    let settings = MonitorSettings::load()?;
    let repository = Arc::new(SessionRepository::new());
    let (events_tx, mut events_rx) = mpsc::channel(1024);
    let (_stop_tx, stop_rx) = watch::channel::<Option<StopRequest>>(None);

    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                MonitorEvent::CalibrationComplete { profile } => {
                    info!(
                        baseline_ear = profile.baseline_ear,
                        baseline_mar = profile.baseline_mar,
                        "Calibration complete"
                    );
                }
                MonitorEvent::Alert {
                    severity,
                    score,
                    reasons,
                } => {
                    info!(severity, score, ?reasons, "FATIGUE ALERT");
                }
                _ => {}
            }
        }
    });

    let runtime = MonitorRuntime::new(settings, Arc::clone(&repository), events_tx);
    let mut source = ScriptedSource::new(demo_session());
    let outcome = runtime.run(&mut source, stop_rx).await?;

    // Close the event channel so the printer drains and exits
    drop(runtime);
    printer.await?;

    if let Some(report) = outcome.report {
        info!(
            session_id = %outcome.session_id,
            duration_secs = report.total_duration_seconds,
            perclos = report.metrics.perclos,
            yawns = report.metrics.num_yawns,
            alerts = report.metrics.alerts_fired,
            fatigued = report.metrics.is_fatigued,
            "Session finished"
        );
        if let Some(json) = repository.export_final_json(outcome.session_id)? {
            println!("{json}");
        }
    }

    Ok(())
}

/// A 60-second scripted session at 10 fps: alert calibration baseline,
/// then drowsy behavior (long closures, a yawn, a still gaze)
fn demo_session() -> Vec<CapturedFrame> {
    let mut frames = Vec::new();
    let mut t = 0.0;
    let mut push = |frames: &mut Vec<CapturedFrame>, ear: f64, mar: f64, iris: (f64, f64)| {
        frames.push(CapturedFrame {
            landmarks: Some(scripted_landmarks(ear, mar, iris)),
            width: 640.0,
            height: 640.0,
            timestamp: t,
        });
        t += 0.1;
    };

    // Calibration: eyes open, mouth relaxed, gaze wandering
    for i in 0..105 {
        let iris = (0.5 + 0.002 * (i % 7) as f64, 0.5);
        push(&mut frames, 0.30, 0.15, iris);
    }

    // Drowsy phase: heavy eyelids with long closures
    for cycle in 0..15 {
        for _ in 0..14 {
            push(&mut frames, 0.12, 0.15, (0.5, 0.5));
        }
        for _ in 0..16 {
            push(&mut frames, 0.28, 0.15, (0.5, 0.5));
        }
        // One 2-second yawn midway through
        if cycle == 7 {
            for _ in 0..20 {
                push(&mut frames, 0.26, 0.75, (0.5, 0.5));
            }
        }
    }

    frames
}

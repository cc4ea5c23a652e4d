//! Alert throttling
//!
//! A fatigued verdict can hold across many consecutive frames; the gate
//! turns that into at most one fired alert per cooldown window instead of
//! an alert storm.

use serde::{Deserialize, Serialize};

/// How strongly the composite score exceeded the fatigue threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Moderate,
    Severe,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Moderate => "moderate",
            AlertSeverity::Severe => "severe",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert that passed the cooldown gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredAlert {
    pub severity: AlertSeverity,
    /// Composite score at fire time
    pub score: u32,
}

/// Cooldown gate: a single timestamp, not an event bus
#[derive(Debug, Clone, Copy)]
pub struct AlertGate {
    cooldown_secs: f64,
    last_fired_at: Option<f64>,
}

impl AlertGate {
    pub fn new(cooldown_secs: f64) -> Self {
        Self {
            cooldown_secs,
            last_fired_at: None,
        }
    }

    /// Whether enough time has passed since the last fired alert
    pub fn should_fire(&self, now: f64) -> bool {
        match self.last_fired_at {
            Some(last) => now - last >= self.cooldown_secs,
            None => true,
        }
    }

    /// Reset the cooldown clock to the fire time
    pub fn record_fire(&mut self, now: f64) {
        self.last_fired_at = Some(now);
    }
}

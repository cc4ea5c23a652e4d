//! Monitor settings
//!
//! Layered configuration: built-in defaults, then an optional `vigileye` file,
//! then `VIGILEYE_`-prefixed environment variables.

use config::{Config, ConfigError, Environment, File};
use fatigue_core::FatigueConfig;
use serde::{Deserialize, Serialize};

/// Runtime settings for the monitor worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Seconds between periodic snapshot pushes to the session store
    pub snapshot_interval_secs: f64,

    /// Fatigue pipeline thresholds and weights
    pub fatigue: FatigueConfig,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            snapshot_interval_secs: 5.0,
            fatigue: FatigueConfig::default(),
        }
    }
}

impl MonitorSettings {
    /// Load settings from file and environment over the defaults
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&MonitorSettings::default())?)
            .add_source(File::with_name("vigileye").required(false))
            .add_source(Environment::with_prefix("VIGILEYE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.snapshot_interval_secs, 5.0);
        assert_eq!(settings.fatigue.alert.cooldown_secs, 30.0);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let settings = MonitorSettings::load().unwrap();
        assert_eq!(settings.fatigue.scoring.fatigue_score, 3);
        assert_eq!(settings.fatigue.calibration.duration_secs, 10.0);
    }
}

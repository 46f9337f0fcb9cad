//! Controller configuration parameters
//!
//! All tunable parameters for the bartender.  Values are read from an
//! optional JSON file; anything missing falls back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BartenderConfig {
    // --- Pouring ---
    /// Seconds a pump must stay open per millilitre requested
    pub flow_rate_secs_per_ml: f64,
    /// How long every pump runs during a cleaning cycle (seconds)
    pub clean_duration_secs: u32,
    /// Progress bar redraw cadence during a pour (milliseconds)
    pub progress_interval_ms: u32,

    // --- Input ---
    /// Minimum spacing between accepted advance presses (milliseconds)
    pub advance_bounce_ms: u32,
    /// Minimum spacing between accepted select presses (milliseconds)
    pub select_bounce_ms: u32,
    /// Minimum spacing between accepted shutdown presses (milliseconds)
    pub shutdown_bounce_ms: u32,

    // --- Screen ---
    /// How long an operator notice stays up (milliseconds)
    pub notice_ms: u32,
    /// Appended to the pump option that is currently assigned
    pub selection_marker: String,

    // --- Host ---
    /// Location of the persisted pump registry
    pub pump_config_path: PathBuf,
    /// Program and arguments run to power the host down
    pub shutdown_command: Vec<String>,
}

impl Default for BartenderConfig {
    fn default() -> Self {
        Self {
            // Pouring
            flow_rate_secs_per_ml: 60.0 / 100.0, // 100 mL/min pumps
            clean_duration_secs: 10,
            progress_interval_ms: 200,

            // Input
            advance_bounce_ms: pins::ADVANCE_BOUNCE_MS,
            select_bounce_ms: pins::SELECT_BOUNCE_MS, // select often starts a long pour
            shutdown_bounce_ms: pins::SHUTDOWN_BOUNCE_MS,

            // Screen
            notice_ms: 2000,
            selection_marker: "*".to_string(),

            // Host
            pump_config_path: PathBuf::from("pump_config.json"),
            shutdown_command: vec![
                "sudo".to_string(),
                "shutdown".to_string(),
                "-h".to_string(),
                "now".to_string(),
            ],
        }
    }
}

impl BartenderConfig {
    /// Read a config file.  Missing fields take their default value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            log::warn!("{}: {}", path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make pours or input handling meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.flow_rate_secs_per_ml.is_finite() && self.flow_rate_secs_per_ml > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "flow_rate_secs_per_ml must be positive",
            ));
        }
        if self.clean_duration_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "clean_duration_secs must be non-zero",
            ));
        }
        if self.progress_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "progress_interval_ms must be non-zero",
            ));
        }
        if self.selection_marker.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "selection_marker must not be blank",
            ));
        }
        if self.shutdown_command.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "shutdown_command must name a program",
            ));
        }
        Ok(())
    }

    pub fn clean_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.clean_duration_secs))
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.progress_interval_ms))
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.notice_ms))
    }
}

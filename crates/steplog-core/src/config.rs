//! Logger configuration
//!
//! Defaults match the original bench rig: 500 ms sampling, 1 MB log cap,
//! 12-bit ADC against a 3.3 V reference, 1.5 V step setpoint applied after
//! a 3 s baseline window.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field value is out of range
    #[error("invalid value for '{field}': {message}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// Runtime configuration for a logging session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Sampling interval in milliseconds
    pub sample_interval_ms: u32,
    /// Baseline window before the step is applied, in milliseconds
    pub initial_wait_ms: u32,
    /// Hard cap on the persisted log size in bytes
    pub capacity_bytes: u64,
    /// Number of distinct ADC codes (4096 for a 12-bit converter)
    pub adc_resolution: u32,
    /// Full-scale reference voltage
    pub reference_volts: f64,
    /// Setpoint voltage applied when the step fires
    pub step_setpoint_volts: f64,
    /// Path of the CSV log file
    pub log_path: PathBuf,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 500,
            initial_wait_ms: 3000,
            capacity_bytes: 1_000_000,
            adc_resolution: 4096,
            reference_volts: 3.3,
            step_setpoint_volts: 1.5,
            log_path: PathBuf::from("data.csv"),
        }
    }
}

impl LoggerConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: LoggerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all field values are internally consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "sample_interval_ms",
                message: "must be at least 1".into(),
            });
        }
        if self.adc_resolution < 2 {
            return Err(ConfigError::Invalid {
                field: "adc_resolution",
                message: format!("{} is too small for a converter", self.adc_resolution),
            });
        }
        if self.reference_volts <= 0.0 || !self.reference_volts.is_finite() {
            return Err(ConfigError::Invalid {
                field: "reference_volts",
                message: format!("{} is not a usable reference", self.reference_volts),
            });
        }
        if !(0.0..=self.reference_volts).contains(&self.step_setpoint_volts) {
            return Err(ConfigError::Invalid {
                field: "step_setpoint_volts",
                message: format!(
                    "{} is outside 0..={}",
                    self.step_setpoint_volts, self.reference_volts
                ),
            });
        }
        if self.capacity_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "capacity_bytes",
                message: "must leave room for at least the header".into(),
            });
        }
        Ok(())
    }
}

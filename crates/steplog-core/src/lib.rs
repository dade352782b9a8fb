//! # steplog Core Library
//!
//! Core functionality for the steplog data logger.
//!
//! This library provides:
//! - A fixed-interval sampling clock with wraparound-safe arithmetic
//! - ADC count to voltage conversion
//! - A bounded append-only CSV log writer
//! - A periodic voltage sampler and a step-response test session
//! - A single-character operator command surface
//! - A simulated first-order analog plant for hardware-free runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use steplog_core::{config::LoggerConfig, sim::PlantSimulator, step::StepSession};
//!
//! let config = LoggerConfig::default();
//! let (plant, input, output) =
//!     PlantSimulator::new(config.reference_volts, config.adc_resolution).shared();
//! let mut session = StepSession::new(&config, Box::new(input), Box::new(output));
//! session.ensure_log()?;
//!
//! // one loop iteration: advance the plant, then poll the session
//! plant.borrow_mut().advance(now_ms);
//! session.poll(now_ms)?;
//! ```

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod console;
pub mod convert;
pub mod hal;
pub mod log;
pub mod sampler;
pub mod sim;
pub mod step;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::SampleClock;
    pub use crate::config::{ConfigError, LoggerConfig};
    pub use crate::console::Command;
    pub use crate::hal::{AnalogInput, AnalogOutput};
    pub use crate::log::{BoundedCsvLog, LogError, LogInfo, Sample};
    pub use crate::sampler::PeriodicSampler;
    pub use crate::sim::PlantSimulator;
    pub use crate::step::{StepPhase, StepSession};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

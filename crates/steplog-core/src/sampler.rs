//! Periodic voltage sampler
//!
//! The plain logging variant: read the analog input at a fixed interval,
//! convert to volts, append to the bounded log. Timestamps are relative to
//! sampler construction.

use crate::clock::SampleClock;
use crate::config::LoggerConfig;
use crate::console::Command;
use crate::convert;
use crate::hal::AnalogInput;
use crate::log::{BoundedCsvLog, LogError, Sample};

/// CSV header for the plain sampler log
pub const CSV_HEADER: &str = "timestamp_ms,voltage";

/// How many samples between one-line status echoes
const STATUS_EVERY: u64 = 10;

/// Fixed-rate sampler appending `timestamp_ms,voltage` rows
pub struct PeriodicSampler {
    clock: SampleClock,
    log: BoundedCsvLog,
    input: Box<dyn AnalogInput>,
    enabled: bool,
    sample_count: u64,
    started_at_ms: u32,
    adc_resolution: u32,
    reference_volts: f64,
}

impl PeriodicSampler {
    /// Build a sampler from a configuration and an analog input.
    ///
    /// `now_ms` becomes the zero point for recorded timestamps. The sampler
    /// starts enabled; `s` toggles it.
    pub fn new(config: &LoggerConfig, input: Box<dyn AnalogInput>, now_ms: u32) -> Self {
        Self {
            clock: SampleClock::new(config.sample_interval_ms),
            log: BoundedCsvLog::new(&config.log_path, CSV_HEADER, config.capacity_bytes),
            input,
            enabled: true,
            sample_count: 0,
            started_at_ms: now_ms,
            adc_resolution: config.adc_resolution,
            reference_volts: config.reference_volts,
        }
    }

    /// Create the log file with its header if absent
    pub fn ensure_log(&self) -> Result<(), LogError> {
        self.log.ensure_initialized()
    }

    /// Whether sampling is currently on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Suspend sampling until the operator toggles it back on.
    ///
    /// Used when log storage fails to initialize at startup: the condition
    /// is reported once and the sampler goes quiet instead of surfacing the
    /// same I/O failure on every due tick.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Samples appended since startup or the last clear
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// The underlying log writer
    pub fn log(&self) -> &BoundedCsvLog {
        &self.log
    }

    /// One sampling tick.
    ///
    /// Returns the sample that was appended, if one was due. On capacity
    /// exhaustion the sampler disables itself and the error is passed up
    /// for the caller to report once; other I/O errors leave it enabled.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<Sample>, LogError> {
        if !self.enabled || !self.clock.tick(now_ms) {
            return Ok(None);
        }

        let raw = self.input.read_raw();
        let volts = convert::raw_to_volts(raw, self.adc_resolution, self.reference_volts);
        let sample = Sample::new(now_ms.wrapping_sub(self.started_at_ms), vec![volts]);

        match self.log.append(&sample) {
            Ok(()) => {
                self.sample_count += 1;
                if self.sample_count % STATUS_EVERY == 0 {
                    tracing::info!(
                        "[{}] t={} ms, voltage={:.3} V",
                        self.sample_count,
                        sample.timestamp_ms,
                        volts
                    );
                }
                Ok(Some(sample))
            }
            Err(e) => {
                if e.is_capacity() {
                    self.enabled = false;
                }
                Err(e)
            }
        }
    }

    /// Handle an operator command.
    ///
    /// The plain sampler understands `p`/`c`/`i`/`s`; anything else returns
    /// `None` and is ignored. Storage failures are rendered into the reply
    /// rather than propagated, keeping the console loop alive.
    pub fn handle_command(&mut self, cmd: Command) -> Option<String> {
        match cmd {
            Command::Dump => {
                // pause logging while the log is being printed
                self.enabled = false;
                Some(match self.log.read_all() {
                    Ok(content) => format!(
                        "========== LOG CONTENTS ==========\n{content}=================================="
                    ),
                    Err(e) => format!("ERROR: could not read log: {e}"),
                })
            }
            Command::Clear => Some(match self.log.clear() {
                Ok(()) => {
                    self.sample_count = 0;
                    "Log cleared".to_string()
                }
                Err(e) => format!("ERROR: could not clear log: {e}"),
            }),
            Command::Info => Some(match self.log.info() {
                Ok(info) => format!(
                    "---------- LOG INFO ----------\n\
                     Log file:     {}\n\
                     Capacity:     {} bytes\n\
                     Used:         {} bytes\n\
                     Sample rows:  {}\n\
                     This run:     {} samples\n\
                     ------------------------------",
                    self.log.path().display(),
                    info.capacity_bytes,
                    info.used_bytes,
                    info.sample_rows,
                    self.sample_count
                ),
                Err(e) => format!("ERROR: could not stat log: {e}"),
            }),
            Command::Toggle => {
                self.enabled = !self.enabled;
                Some(format!(
                    "Logging {}",
                    if self.enabled { "ENABLED" } else { "DISABLED" }
                ))
            }
            _ => None,
        }
    }
}

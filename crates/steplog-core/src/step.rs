//! Step-response test session
//!
//! Open-loop step test: hold the output at 0 V while recording a baseline,
//! then drive it to the configured setpoint after the initial wait and keep
//! recording the sensor's reaction. Timestamps are relative to the start of
//! the run.

use crate::clock::SampleClock;
use crate::config::LoggerConfig;
use crate::console::{Command, HELP};
use crate::convert;
use crate::hal::{AnalogInput, AnalogOutput};
use crate::log::{BoundedCsvLog, LogError, Sample};

/// CSV header for the step-response log
pub const CSV_HEADER: &str = "timestamp_ms,setpoint_v,sensor_v";

const STATUS_EVERY: u64 = 10;

/// Phase of a step-response run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// No run in progress; output at 0 V, logging off
    Idle,
    /// Run started, recording pre-step baseline
    Baseline,
    /// Step applied, recording the response
    Stepped,
}

/// State for one step-response rig: sampler, output drive, and run phase
pub struct StepSession {
    clock: SampleClock,
    log: BoundedCsvLog,
    input: Box<dyn AnalogInput>,
    output: Box<dyn AnalogOutput>,
    phase: StepPhase,
    enabled: bool,
    sample_count: u64,
    step_start_ms: u32,
    setpoint_volts: f64,
    step_setpoint_volts: f64,
    initial_wait_ms: u32,
    adc_resolution: u32,
    reference_volts: f64,
}

impl StepSession {
    /// Build a session from a configuration plus input and output sides.
    /// Drives the output to 0 V immediately, matching the idle contract.
    pub fn new(
        config: &LoggerConfig,
        input: Box<dyn AnalogInput>,
        output: Box<dyn AnalogOutput>,
    ) -> Self {
        let mut session = Self {
            clock: SampleClock::new(config.sample_interval_ms),
            log: BoundedCsvLog::new(&config.log_path, CSV_HEADER, config.capacity_bytes),
            input,
            output,
            phase: StepPhase::Idle,
            enabled: false,
            sample_count: 0,
            step_start_ms: 0,
            setpoint_volts: 0.0,
            step_setpoint_volts: config.step_setpoint_volts,
            initial_wait_ms: config.initial_wait_ms,
            adc_resolution: config.adc_resolution,
            reference_volts: config.reference_volts,
        };
        session.set_setpoint(0.0);
        session
    }

    /// Create the log file with its header if absent
    pub fn ensure_log(&self) -> Result<(), LogError> {
        self.log.ensure_initialized()
    }

    /// Current run phase
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Whether sampling is currently on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Samples appended since the run started or the last clear
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Currently commanded setpoint in volts
    pub fn setpoint_volts(&self) -> f64 {
        self.setpoint_volts
    }

    /// The underlying log writer
    pub fn log(&self) -> &BoundedCsvLog {
        &self.log
    }

    /// Clamp and drive the output, remembering the commanded value
    fn set_setpoint(&mut self, volts: f64) {
        self.setpoint_volts = convert::clamp_volts(volts, self.reference_volts);
        self.output.write_output(self.setpoint_volts);
    }

    /// Start a run: clear the log, enable sampling, record the reference
    /// time, enter `Baseline`. Rejected unless the session is idle.
    pub fn start_run(&mut self, now_ms: u32) -> String {
        if self.phase != StepPhase::Idle {
            return "Run already in progress. Press 'r' to reset first.".to_string();
        }
        if let Err(e) = self.log.clear() {
            return format!("ERROR: could not clear log, run not started: {e}");
        }
        self.sample_count = 0;
        self.enabled = true;
        self.step_start_ms = now_ms;
        self.phase = StepPhase::Baseline;
        tracing::info!(initial_wait_ms = self.initial_wait_ms, "step response run started");
        format!(
            ">>> LOGGING STARTED - recording baseline, step in {} ms <<<",
            self.initial_wait_ms
        )
    }

    /// Return to the post-startup state: output at 0 V, run abandoned,
    /// logging off, sample counter zeroed. Idempotent.
    pub fn reset(&mut self) -> String {
        self.set_setpoint(0.0);
        self.phase = StepPhase::Idle;
        self.enabled = false;
        self.sample_count = 0;
        ">>> RESET: setpoint back to 0 V. Press 'g' to start a new test <<<".to_string()
    }

    /// Move the setpoint by `delta_volts`, clamped into `[0, reference]`,
    /// and drive the output
    pub fn nudge_setpoint(&mut self, delta_volts: f64) -> String {
        self.set_setpoint(self.setpoint_volts + delta_volts);
        format!("Setpoint: {:.2} V", self.setpoint_volts)
    }

    /// Read the sensor and report the live values without mutating the run
    pub fn values(&mut self) -> String {
        let raw = self.input.read_raw();
        let sensor = convert::raw_to_volts(raw, self.adc_resolution, self.reference_volts);
        format!(
            "Current setpoint: {:.2} V\n\
             Current sensor:   {:.3} V\n\
             Step applied:     {}\n\
             Logging:          {}\n\
             Samples:          {}",
            self.setpoint_volts,
            sensor,
            if self.phase == StepPhase::Stepped { "YES" } else { "NO" },
            if self.enabled { "ON" } else { "OFF" },
            self.sample_count
        )
    }

    fn apply_step(&mut self) {
        self.set_setpoint(self.step_setpoint_volts);
        self.phase = StepPhase::Stepped;
        tracing::info!(
            setpoint_volts = self.setpoint_volts,
            ">>> STEP APPLIED: 0 V -> {:.2} V <<<",
            self.setpoint_volts
        );
    }

    /// One loop iteration: apply the step if its wait has elapsed, then
    /// take at most one sample.
    ///
    /// Recorded timestamps are relative to the run start. On capacity
    /// exhaustion the session disables itself and the error is passed up
    /// for the caller to report once.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<Sample>, LogError> {
        if self.enabled
            && self.phase == StepPhase::Baseline
            && now_ms.wrapping_sub(self.step_start_ms) >= self.initial_wait_ms
        {
            self.apply_step();
        }

        if !self.enabled || !self.clock.tick(now_ms) {
            return Ok(None);
        }

        let raw = self.input.read_raw();
        let sensor = convert::raw_to_volts(raw, self.adc_resolution, self.reference_volts);
        let sample = Sample::new(
            now_ms.wrapping_sub(self.step_start_ms),
            vec![self.setpoint_volts, sensor],
        );

        match self.log.append(&sample) {
            Ok(()) => {
                self.sample_count += 1;
                if self.sample_count % STATUS_EVERY == 0 {
                    tracing::info!(
                        "[{}] t={} ms, setpoint={:.2} V, sensor={:.3} V",
                        self.sample_count,
                        sample.timestamp_ms,
                        self.setpoint_volts,
                        sensor
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

    /// Handle an operator command, returning the text to print.
    ///
    /// Every command in the surface is understood here; storage failures
    /// are rendered into the reply so the loop keeps running.
    pub fn handle_command(&mut self, cmd: Command, now_ms: u32) -> String {
        match cmd {
            Command::StartRun => self.start_run(now_ms),
            Command::Reset => self.reset(),
            Command::Values => self.values(),
            Command::Nudge(delta) => self.nudge_setpoint(delta),
            Command::Help => HELP.to_string(),
            Command::Dump => {
                // pause logging while the log is being printed
                self.enabled = false;
                match self.log.read_all() {
                    Ok(content) => format!(
                        "========== LOG CONTENTS ==========\n{content}=================================="
                    ),
                    Err(e) => format!("ERROR: could not read log: {e}"),
                }
            }
            Command::Clear => match self.log.clear() {
                Ok(()) => {
                    self.sample_count = 0;
                    "Log cleared".to_string()
                }
                Err(e) => format!("ERROR: could not clear log: {e}"),
            },
            Command::Info => match self.log.info() {
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
            },
            Command::Toggle => {
                self.enabled = !self.enabled;
                format!(
                    "Logging {}",
                    if self.enabled { "ENABLED" } else { "DISABLED" }
                )
            }
        }
    }
}

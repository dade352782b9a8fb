//! Step-response logging harness
//!
//! Interactive console front end for [`StepSession`] against the simulated
//! plant. One loop iteration handles at most one command line and one
//! sampling poll; everything is single-threaded and cooperative.

use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use steplog_core::config::LoggerConfig;
use steplog_core::console::{Command, HELP};
use steplog_core::sim::PlantSimulator;
use steplog_core::step::StepSession;

/// How often the loop polls for a due sample
const POLL_PERIOD_MS: u64 = 10;

fn now_ms(start: Instant) -> u32 {
    // free-running millisecond counter, wraps like the hardware one
    start.elapsed().as_millis() as u32
}

fn load_config() -> anyhow::Result<LoggerConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            LoggerConfig::from_file(&path).with_context(|| format!("loading config from {path}"))
        }
        None => Ok(LoggerConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;

    let (plant, input, output) =
        PlantSimulator::new(config.reference_volts, config.adc_resolution).shared();
    let mut session = StepSession::new(&config, Box::new(input), Box::new(output));

    println!("========================================");
    println!("   steplog step-response harness v{}", steplog_core::VERSION);
    println!("========================================");
    println!(
        "log file: {} (cap {} bytes), sampling every {} ms, step to {:.2} V after {} ms",
        config.log_path.display(),
        config.capacity_bytes,
        config.sample_interval_ms,
        config.step_setpoint_volts,
        config.initial_wait_ms
    );

    // a failed init is fatal to logging only; commands keep working
    if let Err(e) = session.ensure_log() {
        tracing::error!("could not initialize log storage: {e}");
        println!("WARNING: log storage unavailable, sampling will fail until 'c' succeeds");
    }

    println!("{}", session.handle_command(Command::Info, 0));
    println!("{HELP}");
    println!(">>> Setpoint at 0 V. Press 'g' to start the step response test <<<");

    let start = Instant::now();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(Duration::from_millis(POLL_PERIOD_MS));
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if let Some(cmd) = Command::parse_line(&line) {
                            println!("{}", session.handle_command(cmd, now_ms(start)));
                        }
                    }
                    // stdin closed, stop the harness
                    None => break,
                }
            }
            _ = poll.tick() => {
                let now = now_ms(start);
                plant.borrow_mut().advance(now);
                if let Err(e) = session.poll(now) {
                    println!("WARNING: {e}");
                }
            }
        }
    }

    Ok(())
}

//! Plain periodic voltage logger
//!
//! The simple logging variant: samples the (simulated) analog input at a
//! fixed interval from startup and appends `timestamp_ms,voltage` rows
//! until the log cap is hit. Commands: p/c/i/s.

use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use steplog_core::config::LoggerConfig;
use steplog_core::console::Command;
use steplog_core::sampler::PeriodicSampler;
use steplog_core::sim::PlantSimulator;

const POLL_PERIOD_MS: u64 = 10;

fn now_ms(start: Instant) -> u32 {
    start.elapsed().as_millis() as u32
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            LoggerConfig::from_file(&path).with_context(|| format!("loading config from {path}"))?
        }
        None => LoggerConfig::default(),
    };

    // input side only; the undriven plant just sits at ambient
    let (plant, input, _output) =
        PlantSimulator::new(config.reference_volts, config.adc_resolution).shared();

    let start = Instant::now();
    let mut sampler = PeriodicSampler::new(&config, Box::new(input), now_ms(start));

    println!("steplog sampler v{}", steplog_core::VERSION);
    println!(
        "log file: {} (cap {} bytes), sampling every {} ms",
        config.log_path.display(),
        config.capacity_bytes,
        config.sample_interval_ms
    );
    println!("commands: 'p' print, 'c' clear, 'i' info, 's' toggle logging");

    if let Err(e) = sampler.ensure_log() {
        tracing::error!("could not initialize log storage: {e}");
        println!("WARNING: log storage unavailable, logging disabled; fix storage and press 's'");
        sampler.disable();
    }

    if let Some(info) = sampler.handle_command(Command::Info) {
        println!("{info}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(Duration::from_millis(POLL_PERIOD_MS));
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if let Some(reply) = Command::parse_line(&line)
                            .and_then(|cmd| sampler.handle_command(cmd))
                        {
                            println!("{reply}");
                        }
                    }
                    None => break,
                }
            }
            _ = poll.tick() => {
                let now = now_ms(start);
                plant.borrow_mut().advance(now);
                if let Err(e) = sampler.poll(now) {
                    println!("WARNING: {e}");
                }
            }
        }
    }

    Ok(())
}

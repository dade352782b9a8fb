use steplog_core::config::LoggerConfig;
use steplog_core::console::Command;
use steplog_core::hal::AnalogInput;
use steplog_core::sampler::PeriodicSampler;
use tempfile::TempDir;

/// Scripted input: starts at `raw` and ramps by `step` per read
struct RampInput {
    raw: u16,
    step: u16,
}

impl AnalogInput for RampInput {
    fn read_raw(&mut self) -> u16 {
        let value = self.raw;
        self.raw = self.raw.saturating_add(self.step);
        value
    }
}

fn test_config(dir: &TempDir, capacity_bytes: u64) -> LoggerConfig {
    LoggerConfig {
        capacity_bytes,
        log_path: dir.path().join("data.csv"),
        ..Default::default()
    }
}

fn new_sampler(config: &LoggerConfig) -> PeriodicSampler {
    let input = Box::new(RampInput { raw: 1000, step: 10 });
    let sampler = PeriodicSampler::new(config, input, 0);
    sampler.ensure_log().unwrap();
    sampler
}

#[test]
fn test_samples_only_when_interval_elapses() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);

    assert!(sampler.poll(0).unwrap().is_none());
    assert!(sampler.poll(499).unwrap().is_none());
    assert!(sampler.poll(500).unwrap().is_some());
    assert!(sampler.poll(750).unwrap().is_none());
    assert!(sampler.poll(1000).unwrap().is_some());
    assert_eq!(sampler.sample_count(), 2);
}

#[test]
fn test_timestamps_are_monotonic() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);

    // poll more often than the interval, as the real loop does
    for now in (0..=10_000u32).step_by(130) {
        sampler.poll(now).unwrap();
    }

    let content = sampler.log().read_all().unwrap();
    let timestamps: Vec<u32> = content
        .lines()
        .skip(1)
        .map(|row| row.split(',').next().unwrap().parse().unwrap())
        .collect();
    assert!(timestamps.len() > 10);
    assert!(
        timestamps.windows(2).all(|w| w[0] <= w[1]),
        "timestamps regressed: {timestamps:?}"
    );
}

#[test]
fn test_toggle_suspends_and_resumes_sampling() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);

    assert!(sampler.is_enabled());
    assert_eq!(
        sampler.handle_command(Command::Toggle).unwrap(),
        "Logging DISABLED"
    );
    assert!(sampler.poll(2000).unwrap().is_none());

    assert_eq!(
        sampler.handle_command(Command::Toggle).unwrap(),
        "Logging ENABLED"
    );
    assert!(sampler.poll(4000).unwrap().is_some());
}

#[test]
fn test_capacity_exhaustion_disables_sampler() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 60);
    let mut sampler = new_sampler(&config);

    let mut now = 0u32;
    let err = loop {
        now += 500;
        match sampler.poll(now) {
            Ok(_) => {}
            Err(e) => break e,
        }
        assert!(now < 500_000, "capacity never hit");
    };
    assert!(err.is_capacity());
    assert!(!sampler.is_enabled());

    // suspended: later polls do nothing and report nothing
    assert!(sampler.poll(now + 500).unwrap().is_none());
}

#[test]
fn test_clear_resets_counter_and_file() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);

    for now in [500, 1000, 1500] {
        sampler.poll(now).unwrap();
    }
    assert_eq!(sampler.sample_count(), 3);

    assert_eq!(sampler.handle_command(Command::Clear).unwrap(), "Log cleared");
    assert_eq!(sampler.sample_count(), 0);
    assert_eq!(sampler.log().read_all().unwrap(), "timestamp_ms,voltage\n");
}

#[test]
fn test_dump_pauses_logging() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);
    sampler.poll(500).unwrap();

    let dump = sampler.handle_command(Command::Dump).unwrap();
    assert!(dump.contains("timestamp_ms,voltage"));
    assert!(!sampler.is_enabled());
}

#[test]
fn test_info_reports_row_count() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);
    for now in [500, 1000] {
        sampler.poll(now).unwrap();
    }

    let info = sampler.handle_command(Command::Info).unwrap();
    assert!(info.contains("Sample rows:  2"));
    assert!(info.contains("Capacity:     1000000 bytes"));
}

#[test]
fn test_disabled_after_failed_init_stays_quiet() {
    let dir = TempDir::new().unwrap();
    let config = LoggerConfig {
        // parent directory does not exist, so storage cannot initialize
        log_path: dir.path().join("missing").join("data.csv"),
        ..Default::default()
    };
    let input = Box::new(RampInput { raw: 1000, step: 10 });
    let mut sampler = PeriodicSampler::new(&config, input, 0);
    assert!(sampler.ensure_log().is_err());

    // the failed init is reported once and sampling suspended; due ticks
    // must not keep surfacing the same I/O failure
    sampler.disable();
    assert!(!sampler.is_enabled());
    for now in [500, 1000, 1500, 2000] {
        assert!(sampler.poll(now).unwrap().is_none());
    }

    // the operator can still toggle back on once storage is fixed
    std::fs::create_dir_all(dir.path().join("missing")).unwrap();
    sampler.handle_command(Command::Toggle).unwrap();
    assert!(sampler.poll(2500).unwrap().is_some());
}

#[test]
fn test_step_commands_are_ignored_by_plain_sampler() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 1_000_000);
    let mut sampler = new_sampler(&config);

    assert!(sampler.handle_command(Command::StartRun).is_none());
    assert!(sampler.handle_command(Command::Reset).is_none());
    assert!(sampler.handle_command(Command::Values).is_none());
    assert!(sampler.handle_command(Command::Nudge(0.1)).is_none());
    assert!(sampler.is_enabled());
}

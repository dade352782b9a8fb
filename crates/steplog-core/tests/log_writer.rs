use pretty_assertions::assert_eq;
use steplog_core::log::{BoundedCsvLog, Sample};
use tempfile::TempDir;

const HEADER: &str = "timestamp_ms,voltage";

fn temp_log(capacity_bytes: u64) -> (TempDir, BoundedCsvLog) {
    let dir = TempDir::new().unwrap();
    let log = BoundedCsvLog::new(dir.path().join("data.csv"), HEADER, capacity_bytes);
    (dir, log)
}

#[test]
fn test_fresh_log_starts_with_header() {
    let (_dir, log) = temp_log(1_000_000);
    log.ensure_initialized().unwrap();

    let content = log.read_all().unwrap();
    assert_eq!(content, "timestamp_ms,voltage\n");
}

#[test]
fn test_header_stays_first_after_appends() {
    let (_dir, log) = temp_log(1_000_000);
    log.ensure_initialized().unwrap();

    for i in 0..5u32 {
        log.append(&Sample::new(i * 500, vec![1.0 + i as f64 * 0.1]))
            .unwrap();
    }

    let content = log.read_all().unwrap();
    assert_eq!(content.lines().next().unwrap(), HEADER);
    assert_eq!(content.lines().count(), 6);
}

#[test]
fn test_ensure_initialized_never_rewrites_existing_log() {
    let (_dir, log) = temp_log(1_000_000);
    log.ensure_initialized().unwrap();
    log.append(&Sample::new(500, vec![1.2345])).unwrap();

    let before = log.read_all().unwrap();
    log.ensure_initialized().unwrap();
    assert_eq!(log.read_all().unwrap(), before);
}

#[test]
fn test_append_without_init_still_writes_header_first() {
    let (_dir, log) = temp_log(1_000_000);
    log.append(&Sample::new(500, vec![0.5])).unwrap();

    let content = log.read_all().unwrap();
    assert_eq!(content, "timestamp_ms,voltage\n500,0.5000\n");
}

#[test]
fn test_capacity_ceiling_refuses_further_rows() {
    // header is 21 bytes, each row "<t>,x.xxxx\n"; cap fits only a few rows
    let (_dir, log) = temp_log(40);
    log.ensure_initialized().unwrap();

    let mut appended = 0;
    let err = loop {
        match log.append(&Sample::new(appended * 500, vec![1.0])) {
            Ok(()) => appended += 1,
            Err(e) => break e,
        }
        assert!(appended < 100, "capacity never enforced");
    };
    assert!(err.is_capacity());
    assert!(appended >= 1);

    // a refused append must not grow the file
    let size_after_refusal = log.info().unwrap().used_bytes;
    assert!(log.append(&Sample::new(9999, vec![1.0])).is_err());
    assert_eq!(log.info().unwrap().used_bytes, size_after_refusal);
}

#[test]
fn test_clear_is_idempotent() {
    let (_dir, log) = temp_log(1_000_000);
    log.ensure_initialized().unwrap();
    for i in 0..3u32 {
        log.append(&Sample::new(i, vec![0.1])).unwrap();
    }

    log.clear().unwrap();
    let once = log.read_all().unwrap();
    log.clear().unwrap();
    let twice = log.read_all().unwrap();

    assert_eq!(once, "timestamp_ms,voltage\n");
    assert_eq!(once, twice);
    assert_eq!(log.info().unwrap().sample_rows, 0);
}

#[test]
fn test_clearing_reopens_capacity() {
    let (_dir, log) = temp_log(40);
    log.ensure_initialized().unwrap();
    while log.append(&Sample::new(0, vec![1.0])).is_ok() {}

    log.clear().unwrap();
    assert!(log.append(&Sample::new(0, vec![1.0])).is_ok());
}

#[test]
fn test_info_counts_data_rows() {
    let (_dir, log) = temp_log(1_000_000);
    log.ensure_initialized().unwrap();
    assert_eq!(log.info().unwrap().sample_rows, 0);

    for i in 0..4u32 {
        log.append(&Sample::new(i * 500, vec![2.0])).unwrap();
    }
    let info = log.info().unwrap();
    assert_eq!(info.sample_rows, 4);
    assert_eq!(info.capacity_bytes, 1_000_000);
    assert_eq!(info.used_bytes, log.read_all().unwrap().len() as u64);
}

#[test]
fn test_info_on_absent_file_reports_zero() {
    let (_dir, log) = temp_log(1_000_000);
    // never initialized, file does not exist
    let info = log.info().unwrap();
    assert_eq!(info.used_bytes, 0);
    assert_eq!(info.sample_rows, 0);
}

#[test]
fn test_io_failure_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    // path points into a directory that does not exist
    let log = BoundedCsvLog::new(dir.path().join("missing").join("data.csv"), HEADER, 1000);
    assert!(log.ensure_initialized().is_err());
    assert!(log.append(&Sample::new(0, vec![1.0])).is_err());
}

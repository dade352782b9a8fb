//! Bounded append-only CSV writer
//!
//! One file, one header row, data rows appended until the byte cap. The
//! backing file is opened and released per operation; no handle is held
//! between loop iterations.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{LogError, Sample};

/// Capacity and usage report for a log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogInfo {
    /// Configured byte ceiling
    pub capacity_bytes: u64,
    /// Bytes currently persisted (0 if the file is absent)
    pub used_bytes: u64,
    /// Number of data rows, excluding the header
    pub sample_rows: u64,
}

/// Append-only CSV log with a fixed header and a hard size cap
#[derive(Debug, Clone)]
pub struct BoundedCsvLog {
    path: PathBuf,
    header: String,
    capacity_bytes: u64,
}

impl BoundedCsvLog {
    /// Create a writer for `path` with the given header line (no trailing
    /// newline) and byte cap. Touches no storage until an operation runs.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(
        path: P,
        header: S,
        capacity_bytes: u64,
    ) -> Self {
        Self {
            path: path.into(),
            header: header.into(),
            capacity_bytes,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header line, without the trailing newline
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Create the log file with its header row if it does not exist yet.
    /// Idempotent: an existing file is left untouched, header included.
    pub fn ensure_initialized(&self) -> Result<(), LogError> {
        if self.path.exists() {
            return Ok(());
        }
        fs::write(&self.path, format!("{}\n", self.header))?;
        tracing::info!(path = %self.path.display(), "created log file with header");
        Ok(())
    }

    /// Append one sample as a CSV row.
    ///
    /// Checks the persisted size first: at or above the cap nothing is
    /// written and `CapacityReached` is returned, at which point the caller
    /// suspends sampling until the log is cleared.
    pub fn append(&self, sample: &Sample) -> Result<(), LogError> {
        // a row must never land in a headerless file
        self.ensure_initialized()?;
        let used_bytes = self.used_bytes()?;
        if used_bytes >= self.capacity_bytes {
            tracing::warn!(
                used_bytes,
                capacity_bytes = self.capacity_bytes,
                "log capacity reached, refusing to append"
            );
            return Err(LogError::CapacityReached {
                used_bytes,
                capacity_bytes: self.capacity_bytes,
            });
        }

        // Scoped open for this single row; the handle is released on every
        // exit path, write failure included.
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(sample.to_csv_row().as_bytes())?;
        Ok(())
    }

    /// Truncate the log back to header-only content. Idempotent.
    pub fn clear(&self) -> Result<(), LogError> {
        fs::write(&self.path, format!("{}\n", self.header))?;
        Ok(())
    }

    /// Read the full persisted content
    pub fn read_all(&self) -> Result<String, LogError> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Capacity, usage, and data-row count.
    ///
    /// Rows are counted by line terminators minus one for the header; an
    /// empty or absent file reports zero rather than going negative.
    pub fn info(&self) -> Result<LogInfo, LogError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let newlines = content.iter().filter(|&&b| b == b'\n').count() as u64;
        Ok(LogInfo {
            capacity_bytes: self.capacity_bytes,
            used_bytes: content.len() as u64,
            sample_rows: newlines.saturating_sub(1),
        })
    }

    fn used_bytes(&self) -> Result<u64, LogError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

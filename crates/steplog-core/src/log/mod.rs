//! Bounded CSV logging
//!
//! Persists timestamped samples as newline-terminated CSV rows under a hard
//! byte-size cap.

mod error;
mod writer;

pub use error::LogError;
pub use writer::{BoundedCsvLog, LogInfo};

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A single reading: relative timestamp plus derived field values, in the
/// order the log header names them. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the run's reference event (free-running, wraps)
    pub timestamp_ms: u32,
    /// Field values (voltages)
    pub values: Vec<f64>,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp_ms: u32, values: Vec<f64>) -> Self {
        Self {
            timestamp_ms,
            values,
        }
    }

    /// Render the sample as one newline-terminated CSV row.
    ///
    /// Voltages carry exactly 4 decimal places; downstream analysis relies
    /// on the textual precision, not the binary representation.
    pub fn to_csv_row(&self) -> String {
        let mut row = self.timestamp_ms.to_string();
        for value in &self.values {
            // writing to a String cannot fail
            let _ = write!(row, ",{value:.4}");
        }
        row.push('\n');
        row
    }
}

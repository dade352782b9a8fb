//! Log storage errors

use thiserror::Error;

/// Errors that can occur while persisting or inspecting the log
#[derive(Error, Debug)]
pub enum LogError {
    /// An individual open/read/write/truncate on the backing file failed.
    /// Reported to the caller, never fatal to the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted log has reached its configured byte cap. A policy
    /// boundary rather than a fault: the caller suspends sampling until the
    /// log is cleared.
    #[error("log capacity reached: {used_bytes} of {capacity_bytes} bytes used")]
    CapacityReached {
        /// Bytes currently persisted
        used_bytes: u64,
        /// Configured ceiling
        capacity_bytes: u64,
    },
}

impl LogError {
    /// True for the capacity policy boundary (as opposed to an I/O fault)
    pub fn is_capacity(&self) -> bool {
        matches!(self, LogError::CapacityReached { .. })
    }
}

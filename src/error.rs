//! Error types for fsstress
//!
//! Most functions return `anyhow::Result`, but the failures that decide how a
//! phase ends are typed so callers can `downcast_ref::<StressError>()` them.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Phase-fatal failures raised by the timed-run engine
#[derive(Debug, Error)]
pub enum StressError {
    /// A worker directory could not be cleared within the retry bound
    #[error("can't delete folder {} after {attempts} attempts", .path.display())]
    Setup { path: PathBuf, attempts: u32 },

    /// A filesystem call failed inside a worker's measurement loop
    #[error("worker {worker} failed during {phase}: {source}")]
    Operation {
        phase: String,
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked before returning its result
    #[error("worker {worker} panicked during {phase}")]
    WorkerPanicked { phase: String, worker: usize },

    /// Workers did not exit within the configured join timeout
    #[error("{pending} worker(s) still running {timeout:?} after {phase} was stopped")]
    JoinTimeout {
        phase: String,
        pending: usize,
        timeout: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_message_names_path() {
        let err = StressError::Setup {
            path: PathBuf::from("/mnt/x/FileCreates0"),
            attempts: 10,
        };
        assert_eq!(
            err.to_string(),
            "can't delete folder /mnt/x/FileCreates0 after 10 attempts"
        );
    }

    #[test]
    fn test_operation_error_keeps_source() {
        use std::error::Error;

        let err = StressError::Operation {
            phase: "FileCreate".to_string(),
            worker: 3,
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(err.to_string().contains("worker 3"));
        assert_eq!(err.source().unwrap().to_string(), "disk full");
    }
}

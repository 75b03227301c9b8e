//! Statistics collection and reporting
//!
//! Each worker fills exactly one [`WorkerResult`] and hands it back to the
//! controller when its thread is joined. After the join the controller folds
//! all results into a [`PhaseReport`] via [`aggregator::aggregate`].
//!
//! # Example
//!
//! ```
//! use fsstress::stats::{PhaseReport, WorkerResult};
//! use std::time::Duration;
//!
//! let results = vec![
//!     WorkerResult::new(600, 1_048_576, Duration::from_millis(2000)),
//!     WorkerResult::new(400, 1_048_576, Duration::from_millis(2001)),
//! ];
//!
//! let report = PhaseReport::from_results("FileCreate", &results);
//! assert_eq!(report.total_ops, 1000);
//! assert_eq!(report.iops, 500.0);
//! assert_eq!(report.mb_per_sec, 1.0);
//! ```

pub mod aggregator;

use crate::util::time::{calculate_iops, calculate_mib_per_sec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Counters produced by one worker during one phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerResult {
    /// Completed iterations
    pub ops: u64,
    /// Payload bytes written
    pub bytes_written: u64,
    /// Time spent inside the measurement loop
    pub elapsed: Duration,
}

impl WorkerResult {
    pub fn new(ops: u64, bytes_written: u64, elapsed: Duration) -> Self {
        Self {
            ops,
            bytes_written,
            elapsed,
        }
    }

    /// Loop time in whole milliseconds, the unit used by the results log
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Throughput summary of one completed phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub operation: String,
    pub threads: usize,
    pub duration_ms: u64,
    pub total_ops: u64,
    pub iops: f64,
    pub total_bytes: u64,
    pub mb_per_sec: f64,
}

impl PhaseReport {
    /// Build a report from the per-worker results of a phase
    ///
    /// The phase duration is taken from worker 0; every worker shares the same
    /// start/stop window, so any one of them is representative. With no
    /// workers the report is all zeros.
    pub fn from_results(operation: impl Into<String>, results: &[WorkerResult]) -> Self {
        let totals = aggregator::aggregate(results);
        let duration_ms = results.first().map(WorkerResult::elapsed_ms).unwrap_or(0);

        Self::from_totals(operation, results.len(), duration_ms, totals.ops, totals.bytes)
    }

    /// Build a report from already aggregated totals
    pub fn from_totals(
        operation: impl Into<String>,
        threads: usize,
        duration_ms: u64,
        total_ops: u64,
        total_bytes: u64,
    ) -> Self {
        let window = Duration::from_millis(duration_ms);

        Self {
            operation: operation.into(),
            threads,
            duration_ms,
            total_ops,
            iops: calculate_iops(total_ops, window),
            total_bytes,
            mb_per_sec: calculate_mib_per_sec(total_bytes, window),
        }
    }
}

/// One results-log line: `operation, threads, durationMs, totalOps, iops, totalBytes, mbPerSec`
impl fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}",
            self.operation,
            self.threads,
            self.duration_ms,
            self.total_ops,
            self.iops,
            self.total_bytes,
            self.mb_per_sec
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metrics() {
        let report = PhaseReport::from_totals("FileCreateWrites(1024B)", 4, 2000, 1000, 2_097_152);
        assert_eq!(report.iops, 500.0);
        assert_eq!(report.mb_per_sec, 1.0);
    }

    #[test]
    fn test_log_line_format() {
        let report = PhaseReport::from_totals("FileCreate", 4, 2000, 1000, 2_097_152);
        assert_eq!(report.to_string(), "FileCreate, 4, 2000, 1000, 500, 2097152, 1");
    }

    #[test]
    fn test_fractional_rates_keep_precision() {
        let report = PhaseReport::from_totals("FileOpens", 1, 3000, 1000, 0);
        assert!(report.to_string().starts_with("FileOpens, 1, 3000, 1000, 333.33"));
        assert!(report.to_string().ends_with(", 0, 0"));
    }

    #[test]
    fn test_zero_workers_is_all_zero() {
        let report = PhaseReport::from_results("FileCreate", &[]);
        assert_eq!(report.threads, 0);
        assert_eq!(report.duration_ms, 0);
        assert_eq!(report.total_ops, 0);
        assert_eq!(report.iops, 0.0);
        assert_eq!(report.mb_per_sec, 0.0);
        assert!(report.iops.is_finite());
    }

    #[test]
    fn test_duration_comes_from_first_worker() {
        let results = vec![
            WorkerResult::new(10, 0, Duration::from_millis(1500)),
            WorkerResult::new(10, 0, Duration::from_millis(1600)),
        ];
        let report = PhaseReport::from_results("FileCreate", &results);
        assert_eq!(report.duration_ms, 1500);
        assert_eq!(report.threads, 2);
        assert_eq!(report.total_ops, 20);
    }

    #[test]
    fn test_zero_duration_does_not_divide() {
        let results = vec![WorkerResult::new(5, 50, Duration::ZERO)];
        let report = PhaseReport::from_results("FileCreate", &results);
        assert_eq!(report.iops, 0.0);
        assert_eq!(report.mb_per_sec, 0.0);
    }
}

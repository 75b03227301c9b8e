//! Statistics aggregation
//!
//! Folds per-worker results into phase totals. The fold is a pure sum, so it
//! does not matter in which order workers finished or were joined.
//!
//! # Example
//!
//! ```
//! use fsstress::stats::WorkerResult;
//! use fsstress::stats::aggregator::aggregate;
//! use std::time::Duration;
//!
//! let results = [
//!     WorkerResult::new(3, 3072, Duration::from_secs(1)),
//!     WorkerResult::new(2, 2048, Duration::from_secs(1)),
//! ];
//!
//! let totals = aggregate(&results);
//! assert_eq!(totals.ops, 5);
//! assert_eq!(totals.bytes, 5120);
//! ```

use crate::stats::WorkerResult;

/// Summed counters of a phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTotals {
    pub ops: u64,
    pub bytes: u64,
}

/// Sum operation and byte counts across workers
pub fn aggregate(results: &[WorkerResult]) -> PhaseTotals {
    results.iter().fold(PhaseTotals::default(), |acc, r| PhaseTotals {
        ops: acc.ops + r.ops,
        bytes: acc.bytes + r.bytes_written,
    })
}

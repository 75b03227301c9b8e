//! Worker thread implementation
//!
//! A worker repeats one operation body until the phase's [`StopSignal`] is
//! raised and returns its counters as a [`WorkerResult`].
//!
//! # Architecture
//!
//! - **[`OperationBody`]**: one unit of filesystem work, owned by one worker
//! - **[`WorkerContext`]**: the worker's id, phase name and stop signal
//! - **[`WorkerTask`]**: id + body, built before any thread is spawned
//! - **[`pool::WorkerPool`]**: spawns tasks and joins them
//!
//! The loop takes no locks and touches no shared counters. Each worker's
//! iterations are strictly sequential, so its counters are a plain
//! single-threaded measurement.

pub mod pool;
pub mod signal;

pub use pool::WorkerPool;
pub use signal::StopSignal;

use crate::error::StressError;
use crate::stats::WorkerResult;
use std::io;
use std::sync::Arc;
use std::time::Instant;

/// One unit of repeatable filesystem work
pub trait OperationBody: Send {
    /// Perform one iteration and return the number of payload bytes written
    fn iterate(&mut self) -> io::Result<u64>;
}

/// Everything a worker thread needs besides its body
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub id: usize,
    pub phase: Arc<str>,
    pub stop: StopSignal,
}

/// Work assigned to one worker slot
pub struct WorkerTask {
    pub id: usize,
    pub body: Box<dyn OperationBody>,
}

impl WorkerTask {
    pub fn new(id: usize, body: Box<dyn OperationBody>) -> Self {
        Self { id, body }
    }
}

/// Run `body` until the stop signal is raised
///
/// The timer starts right before the first poll and stops right after the
/// loop exits, so an iteration still in flight when the signal is raised is
/// counted and timed. On failure the worker raises the signal itself so the
/// rest of the phase winds down.
pub fn run_worker(
    ctx: &WorkerContext,
    body: &mut dyn OperationBody,
) -> std::result::Result<WorkerResult, StressError> {
    let mut ops = 0u64;
    let mut bytes_written = 0u64;

    let start = Instant::now();
    while !ctx.stop.is_raised() {
        match body.iterate() {
            Ok(n) => {
                ops += 1;
                bytes_written += n;
            }
            Err(source) => {
                ctx.stop.raise();
                return Err(StressError::Operation {
                    phase: ctx.phase.to_string(),
                    worker: ctx.id,
                    source,
                });
            }
        }
    }
    let elapsed = start.elapsed();

    Ok(WorkerResult::new(ops, bytes_written, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;
    use std::time::Duration;

    struct Counting {
        started: Arc<AtomicU64>,
        bytes: u64,
    }

    impl OperationBody for Counting {
        fn iterate(&mut self) -> io::Result<u64> {
            self.started.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_micros(200));
            Ok(self.bytes)
        }
    }

    struct FailsAt {
        remaining: u64,
    }

    impl OperationBody for FailsAt {
        fn iterate(&mut self) -> io::Result<u64> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "No space left on device"));
            }
            self.remaining -= 1;
            Ok(0)
        }
    }

    fn context(stop: &StopSignal) -> WorkerContext {
        WorkerContext {
            id: 0,
            phase: Arc::from("FileCreate"),
            stop: stop.clone(),
        }
    }

    #[test]
    fn test_raised_signal_runs_nothing() {
        let stop = StopSignal::new();
        stop.raise();
        let started = Arc::new(AtomicU64::new(0));
        let mut body = Counting { started: started.clone(), bytes: 0 };

        let result = run_worker(&context(&stop), &mut body).unwrap();
        assert_eq!(result.ops, 0);
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_counts_ops_and_bytes() {
        let stop = StopSignal::new();
        let started = Arc::new(AtomicU64::new(0));
        let ctx = context(&stop);
        let mut body = Counting { started: started.clone(), bytes: 1024 };

        let handle = thread::spawn(move || run_worker(&ctx, &mut body));
        thread::sleep(Duration::from_millis(50));
        stop.raise();
        let result = handle.join().unwrap().unwrap();

        assert!(result.ops > 0);
        assert_eq!(result.ops, started.load(Ordering::SeqCst));
        assert_eq!(result.bytes_written, result.ops * 1024);
        assert!(result.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_no_new_iteration_after_stop() {
        let stop = StopSignal::new();
        let started = Arc::new(AtomicU64::new(0));
        let ctx = context(&stop);
        let mut body = Counting { started: started.clone(), bytes: 0 };

        let handle = thread::spawn(move || run_worker(&ctx, &mut body));
        thread::sleep(Duration::from_millis(30));
        stop.raise();
        let at_stop = started.load(Ordering::SeqCst);
        let result = handle.join().unwrap().unwrap();

        // at most the iteration that was already past the poll may start
        assert!(started.load(Ordering::SeqCst) <= at_stop + 1);
        assert_eq!(result.ops, started.load(Ordering::SeqCst));
    }

    #[test]
    fn test_failure_raises_signal() {
        let stop = StopSignal::new();
        let mut body = FailsAt { remaining: 5 };

        let err = run_worker(&context(&stop), &mut body).unwrap_err();
        assert!(stop.is_raised());
        match err {
            StressError::Operation { worker, phase, source } => {
                assert_eq!(worker, 0);
                assert_eq!(phase, "FileCreate");
                assert_eq!(source.to_string(), "No space left on device");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

//! Worker thread pool
//!
//! Spawns one named OS thread per [`WorkerTask`] and joins them once the
//! controller has raised the stop signal. Each thread reports its exit on a
//! channel (also when it panics), which lets the controller wake up early if
//! a worker dies mid-window and bound the final join with a timeout.

use crate::error::StressError;
use crate::stats::WorkerResult;
use crate::worker::{run_worker, StopSignal, WorkerContext, WorkerTask};
use crate::Result;
use anyhow::Context;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

type WorkerHandle = JoinHandle<std::result::Result<WorkerResult, StressError>>;

/// Sends the worker id when the thread finishes, including by unwinding
struct ExitNotice {
    id: usize,
    tx: Sender<usize>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.tx.send(self.id);
    }
}

/// Running workers of one phase
pub struct WorkerPool {
    phase: Arc<str>,
    handles: Vec<WorkerHandle>,
    exits: Receiver<usize>,
    exited: usize,
}

impl WorkerPool {
    /// Spawn one thread per task
    ///
    /// Tasks must be ordered by id starting at 0; the id is also the index
    /// of the worker's result in [`WorkerPool::join`].
    pub fn spawn(phase: &str, stop: &StopSignal, tasks: Vec<WorkerTask>) -> Result<Self> {
        let phase: Arc<str> = Arc::from(phase);
        let (tx, exits) = channel::unbounded();
        let mut handles = Vec::with_capacity(tasks.len());

        for (slot, task) in tasks.into_iter().enumerate() {
            debug_assert_eq!(slot, task.id, "worker tasks must be ordered by id");

            let ctx = WorkerContext {
                id: task.id,
                phase: phase.clone(),
                stop: stop.clone(),
            };
            let notice = ExitNotice { id: task.id, tx: tx.clone() };
            let mut body = task.body;

            let spawned = thread::Builder::new()
                .name(format!("{}-{}", phase, task.id))
                .spawn(move || {
                    let _notice = notice;
                    run_worker(&ctx, body.as_mut())
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    stop.raise();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e).with_context(|| {
                        format!("Failed to spawn worker {} for {}", task.id, phase)
                    });
                }
            }
        }

        Ok(Self {
            phase,
            handles,
            exits,
            exited: 0,
        })
    }

    /// Number of spawned workers
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Suspend the caller for `window`
    ///
    /// Workers only leave their loop early when they fail, so a healthy phase
    /// waits the full window. Returns false if a worker exited first.
    pub fn wait(&mut self, window: Duration) -> bool {
        match self.exits.recv_timeout(window) {
            Ok(id) => {
                debug!("{} worker {} exited before the window closed", self.phase, id);
                self.exited += 1;
                false
            }
            Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => self.handles.is_empty(),
        }
    }

    /// Wait for every worker to exit, then collect results in id order
    ///
    /// With a `timeout`, gives up with [`StressError::JoinTimeout`] when
    /// workers are still inside a filesystem call after that long; those
    /// threads are left detached. A timeout too large to schedule joins
    /// without a bound.
    pub fn join(mut self, timeout: Option<Duration>) -> Result<Vec<WorkerResult>> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));

        while self.exited < self.handles.len() {
            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    self.exits.recv_timeout(remaining)
                }
                None => self.exits.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(_) => self.exited += 1,
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(StressError::JoinTimeout {
                        phase: self.phase.to_string(),
                        pending: self.handles.len() - self.exited,
                        timeout: timeout.unwrap_or_default(),
                    }
                    .into());
                }
            }
        }

        let mut results = Vec::with_capacity(self.handles.len());
        let mut first_error: Option<StressError> = None;

        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    first_error.get_or_insert(StressError::WorkerPanicked {
                        phase: self.phase.to_string(),
                        worker: id,
                    });
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::OperationBody;
    use std::io;

    struct Spin;

    impl OperationBody for Spin {
        fn iterate(&mut self) -> io::Result<u64> {
            thread::sleep(Duration::from_micros(100));
            Ok(1)
        }
    }

    struct Stall(Duration);

    impl OperationBody for Stall {
        fn iterate(&mut self) -> io::Result<u64> {
            thread::sleep(self.0);
            Ok(0)
        }
    }

    struct Panics;

    impl OperationBody for Panics {
        fn iterate(&mut self) -> io::Result<u64> {
            panic!("driver bug");
        }
    }

    struct Fails;

    impl OperationBody for Fails {
        fn iterate(&mut self) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission revoked"))
        }
    }

    fn tasks(n: usize, make: impl Fn(usize) -> Box<dyn OperationBody>) -> Vec<WorkerTask> {
        (0..n).map(|id| WorkerTask::new(id, make(id))).collect()
    }

    #[test]
    fn test_results_indexed_by_id() {
        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn("test", &stop, tasks(4, |_| Box::new(Spin))).unwrap();
        assert_eq!(pool.len(), 4);

        assert!(pool.wait(Duration::from_millis(30)));
        stop.raise();
        let results = pool.join(None).unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.ops > 0 && r.bytes_written == r.ops));
    }

    #[test]
    fn test_empty_pool() {
        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn("test", &stop, Vec::new()).unwrap();
        assert!(pool.is_empty());
        assert!(pool.wait(Duration::from_millis(1)));
        stop.raise();
        assert!(pool.join(Some(Duration::from_millis(10))).unwrap().is_empty());
    }

    #[test]
    fn test_failure_wakes_waiter() {
        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn("test", &stop, tasks(2, |id| {
            if id == 1 {
                Box::new(Fails) as Box<dyn OperationBody>
            } else {
                Box::new(Spin)
            }
        }))
        .unwrap();

        let started = Instant::now();
        assert!(!pool.wait(Duration::from_secs(30)));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(stop.is_raised());

        let err = pool.join(None).unwrap_err();
        match err.downcast_ref::<StressError>() {
            Some(StressError::Operation { worker, .. }) => assert_eq!(*worker, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_panic_is_reported() {
        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn("test", &stop, tasks(1, |_| Box::new(Panics))).unwrap();
        assert!(!pool.wait(Duration::from_secs(30)));
        stop.raise();

        let err = pool.join(Some(Duration::from_secs(5))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StressError>(),
            Some(StressError::WorkerPanicked { worker: 0, .. })
        ));
    }

    #[test]
    fn test_join_timeout() {
        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn("test", &stop, tasks(2, |id| {
            if id == 0 {
                Box::new(Stall(Duration::from_secs(2))) as Box<dyn OperationBody>
            } else {
                Box::new(Spin)
            }
        }))
        .unwrap();

        pool.wait(Duration::from_millis(20));
        stop.raise();

        let started = Instant::now();
        let err = pool.join(Some(Duration::from_millis(100))).unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(1));
        match err.downcast_ref::<StressError>() {
            Some(StressError::JoinTimeout { pending, .. }) => assert_eq!(*pending, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unschedulable_join_timeout_is_unbounded() {
        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn("test", &stop, tasks(2, |_| Box::new(Spin))).unwrap();

        pool.wait(Duration::from_millis(10));
        stop.raise();

        let results = pool.join(Some(Duration::from_secs(u64::MAX))).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.ops > 0));
    }
}

//! Coordinator module
//!
//! Orchestrates workers and aggregates results. One phase runs as:
//!
//! 1. prepare every worker sequentially on the controller thread
//! 2. create a fresh [`StopSignal`]
//! 3. spawn all workers
//! 4. suspend for the configured duration
//! 5. raise the stop signal
//! 6. join the workers
//! 7. aggregate their results into a [`PhaseReport`]
//! 8. hand the report to the [`ReportSink`]
//!
//! Phases run one after another. The window is a fixed wall-clock sample, not
//! an operation count, so phases and runs compare on ops per time only. A
//! worker's loop time can exceed the window by the latency of the iteration
//! that was in flight when the signal was raised; that tail is reported as is.

use crate::config::{Config, PhaseKind};
use crate::output::ReportSink;
use crate::stats::PhaseReport;
use crate::target::{DirectoryOps, StdFs};
use crate::worker::{StopSignal, WorkerPool, WorkerTask};
use crate::workload::{Workload, WorkloadOperation};
use crate::Result;
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs timed phases and reports their throughput
pub struct TimedRunController {
    config: Arc<Config>,
    sink: Box<dyn ReportSink>,
    dirs: Box<dyn DirectoryOps>,
}

impl TimedRunController {
    pub fn new(config: Arc<Config>, sink: Box<dyn ReportSink>) -> Self {
        Self {
            config,
            sink,
            dirs: Box::new(StdFs),
        }
    }

    /// Replace the directory primitives used during preparation
    pub fn with_directory_ops(mut self, dirs: Box<dyn DirectoryOps>) -> Self {
        self.dirs = dirs;
        self
    }

    /// Run every configured phase in order, stopping at the first failure
    pub fn run_all(&mut self) -> Result<Vec<PhaseReport>> {
        let phases = self.config.ordered_phases();
        let mut reports = Vec::with_capacity(phases.len());

        for kind in phases {
            reports.push(self.run_phase(kind)?);
        }

        Ok(reports)
    }

    /// Run one built-in phase
    pub fn run_phase(&mut self, kind: PhaseKind) -> Result<PhaseReport> {
        let operation = WorkloadOperation::for_phase(kind, &self.config)
            .with_context(|| format!("Failed to set up {} phase", kind))?;
        self.run_workload(&operation)
    }

    /// Run one phase of an arbitrary workload
    pub fn run_workload(&mut self, workload: &dyn Workload) -> Result<PhaseReport> {
        let name = workload.name();
        let threads = self.config.threads;

        info!("Preparing {} for {} worker(s)", name, threads);
        let prepare_start = Instant::now();
        let mut tasks = Vec::with_capacity(threads);
        for id in 0..threads {
            let body = workload
                .prepare(id, &self.config, self.dirs.as_ref())
                .with_context(|| format!("Failed to prepare worker {} for {}", id, name))?;
            tasks.push(WorkerTask::new(id, body));
        }
        debug!("{} prepared in {:.3}s", name, prepare_start.elapsed().as_secs_f64());

        let stop = StopSignal::new();
        let mut pool = WorkerPool::spawn(&name, &stop, tasks)?;

        info!("Running {} for {:?}", name, self.config.duration);
        if !pool.wait(self.config.duration) {
            warn!("{} ended early: a worker exited before the window closed", name);
        }
        stop.raise();

        let results = pool.join(self.config.join_timeout)?;
        let report = PhaseReport::from_results(name, &results);
        debug!(
            "{} finished: {} ops, {} bytes in {} ms",
            report.operation, report.total_ops, report.total_bytes, report.duration_ms
        );

        self.sink.emit(&report)?;
        Ok(report)
    }
}

//! Output formatting and result sinks
//!
//! - **CSV**: append-only results log, one line per phase
//! - **Text**: console mirror and human-readable run summary
//! - **JSON**: optional machine-readable summary of the whole run

pub mod csv;
pub mod json;
pub mod text;

use crate::stats::PhaseReport;
use crate::Result;

/// Destination for completed phase reports
pub trait ReportSink {
    /// Record one completed phase
    fn emit(&mut self, report: &PhaseReport) -> Result<()>;
}

/// Forwards every report to each inner sink in order
pub struct Tee {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl Tee {
    pub fn new(sinks: Vec<Box<dyn ReportSink>>) -> Self {
        Self { sinks }
    }
}

impl ReportSink for Tee {
    fn emit(&mut self, report: &PhaseReport) -> Result<()> {
        for sink in &mut self.sinks {
            sink.emit(report)?;
        }
        Ok(())
    }
}

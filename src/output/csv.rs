//! CSV results log
//!
//! The log has no header row and is never truncated, so results from many
//! runs (different thread counts, different backends) accumulate in one file:
//!
//! ```text
//! FileCreate, 4, 60001, 1843211, 30719.6843052616, 0, 0
//! FileOpens, 4, 60000, 2211009, 36850.15, 0, 0
//! ```

use crate::output::ReportSink;
use crate::stats::PhaseReport;
use crate::Result;
use anyhow::Context;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Append-only CSV log of phase reports
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one line and make it durable before closing the file
    pub fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open results log: {}", self.path.display()))?;

        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write results log: {}", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync results log: {}", self.path.display()))?;

        Ok(())
    }
}

impl ReportSink for CsvLog {
    fn emit(&mut self, report: &PhaseReport) -> Result<()> {
        self.append_line(&report.to_string())
    }
}

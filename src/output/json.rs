//! JSON run summary
//!
//! Written once after the last phase when `--json-output` is given. Unlike
//! the CSV log it is overwritten on every run and carries the configuration
//! the numbers were produced with.

use crate::config::Config;
use crate::stats::PhaseReport;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Complete run summary
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub hostname: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config: &'a Config,
    pub phases: &'a [PhaseReport],
}

impl<'a> RunSummary<'a> {
    pub fn new(config: &'a Config, phases: &'a [PhaseReport], started_at: DateTime<Utc>) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            hostname: local_hostname(),
            started_at,
            finished_at: Utc::now(),
            config,
            phases,
        }
    }
}

fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Serialize `summary` as pretty JSON to `path`
pub fn write_summary(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON output: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, summary).context("Failed to serialize run summary")?;
    writeln!(writer)?;
    writer.flush()
        .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_summary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("summary.json");
        let config = Config::new(temp.path());
        let phases = vec![
            PhaseReport::from_totals("FileCreate", 1, 2000, 1000, 0),
            PhaseReport::from_totals("FileCreateWrites(1024B)", 1, 2000, 1000, 2_097_152),
        ];

        let summary = RunSummary::new(&config, &phases, Utc::now());
        write_summary(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tool"], "fsstress");
        assert_eq!(value["config"]["threads"], 1);
        assert_eq!(value["config"]["duration"], 60.0);
        assert_eq!(value["phases"][0]["operation"], "FileCreate");
        assert_eq!(value["phases"][1]["mb_per_sec"], 1.0);
        assert_eq!(value["phases"][1]["iops"], 500.0);
    }
}

//! Human-readable console output

use crate::config::Config;
use crate::output::ReportSink;
use crate::stats::PhaseReport;
use crate::util::time::{format_duration, format_rate, format_throughput};
use crate::Result;
use std::time::Duration;

/// Mirrors every results-log line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl ReportSink for Console {
    fn emit(&mut self, report: &PhaseReport) -> Result<()> {
        println!("{}", report);
        Ok(())
    }
}

/// Print the effective configuration before the first phase
pub fn print_configuration(config: &Config) {
    println!("Configuration:");
    println!("  Folder:        {}", config.target_dir.display());
    println!("  Threads:       {}", config.threads);
    println!("  Duration:      {} per phase", format_duration(config.duration));
    println!("  Open pool:     {} files per thread", config.open_pool_size);
    println!(
        "  Sharding:      {}",
        if config.nested_sharding { "max 1000 files per folder" } else { "disabled" }
    );
    println!("  Results log:   {}", config.log_path.display());
    if let Some(timeout) = config.join_timeout {
        println!("  Join timeout:  {}", format_duration(timeout));
    }
    let phases: Vec<String> = config.ordered_phases().iter().map(|p| p.to_string()).collect();
    println!("  Phases:        {}", phases.join(", "));
}

/// Print a summary table after all phases completed
pub fn print_summary(reports: &[PhaseReport]) {
    if reports.is_empty() {
        return;
    }

    println!();
    println!("═══════════════════════════════════════════════════════════");
    println!("                    TEST RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    for report in reports {
        println!("{}", summary_line(report));
    }
}

fn summary_line(report: &PhaseReport) -> String {
    let mut line = format!(
        "  {:<28} {:>12} ops in {:>8} - {} IOPS",
        report.operation,
        report.total_ops,
        format_duration(Duration::from_millis(report.duration_ms)),
        format_rate(report.iops)
    );
    if report.total_bytes > 0 {
        line.push_str(&format!(", {}", format_throughput(report.mb_per_sec * 1024.0 * 1024.0)));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_without_bytes() {
        let report = PhaseReport::from_totals("FileCreate", 2, 2000, 3000, 0);
        let line = summary_line(&report);
        assert!(line.contains("FileCreate"));
        assert!(line.contains("1.50K IOPS"));
        assert!(!line.contains("/s"));
    }

    #[test]
    fn test_summary_line_with_bytes() {
        let report = PhaseReport::from_totals("FileCreateWrites(1024B)", 1, 2000, 1000, 2_097_152);
        assert!(summary_line(&report).ends_with("500 IOPS, 1.00 MB/s"));
    }
}

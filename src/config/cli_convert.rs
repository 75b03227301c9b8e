//! CLI to Config conversion utilities

use crate::config::cli::{self, Cli};
use crate::config::{Config, PhaseKind};
use crate::util::buffer::FillPattern;
use anyhow::{Context, Result};
use std::time::Duration;

/// Parse a size string (e.g., "1G", "100M", "4k") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("k") || s.ends_with("kb") {
        (s.trim_end_matches("kb").trim_end_matches("k"), 1024u64)
    } else if s.ends_with("m") || s.ends_with("mb") {
        (s.trim_end_matches("mb").trim_end_matches("m"), 1024 * 1024)
    } else if s.ends_with("g") || s.ends_with("gb") {
        (s.trim_end_matches("gb").trim_end_matches("g"), 1024 * 1024 * 1024)
    } else if s.ends_with("b") {
        (s.trim_end_matches("b"), 1)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size too large: {}", s))
}

/// Parse a duration string (e.g., "60", "60s", "5m", "1h") to seconds
pub fn parse_duration(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("sec") || s.ends_with("s") {
        (s.trim_end_matches("sec").trim_end_matches("s"), 1u64)
    } else if s.ends_with("min") || s.ends_with("m") {
        (s.trim_end_matches("min").trim_end_matches("m"), 60)
    } else if s.ends_with("hr") || s.ends_with("h") {
        (s.trim_end_matches("hr").trim_end_matches("h"), 3600)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Duration too large: {}", s))
}

/// Convert CLI phase to config phase
pub fn convert_phase(phase: cli::Phase) -> PhaseKind {
    match phase {
        cli::Phase::Create => PhaseKind::Create,
        cli::Phase::Open => PhaseKind::Open,
        cli::Phase::WriteSmall => PhaseKind::WriteSmall,
        cli::Phase::WriteLarge => PhaseKind::WriteLarge,
    }
}

/// Convert CLI write pattern to payload fill pattern
pub fn convert_write_pattern(pattern: cli::WritePattern) -> FillPattern {
    match pattern {
        cli::WritePattern::Zeros => FillPattern::Zeros,
        cli::WritePattern::Ones => FillPattern::Ones,
        cli::WritePattern::Random => FillPattern::Random,
        cli::WritePattern::Sequential => FillPattern::Sequential,
    }
}

/// Build a configuration from CLI arguments alone
pub fn config_from_cli(cli: &Cli) -> Result<Config> {
    let folder = cli
        .folder
        .clone()
        .context("--folder is required when no --config file is given")?;

    let mut config = Config::new(folder);
    config.log_path = cli.log.clone();
    config.threads = cli.threads;
    config.duration = Duration::from_secs(parse_duration(&cli.duration).context("Invalid duration")?);
    config.open_pool_size = cli.createfiles;
    config.nested_sharding = !cli.nocreatefilesnested;
    config.join_timeout = cli
        .join_timeout
        .as_deref()
        .map(|s| parse_duration(s).context("Invalid join timeout"))
        .transpose()?
        .map(Duration::from_secs);
    config.setup.retries = cli.setup_retries;
    config.setup.backoff = Duration::from_millis(cli.setup_backoff_ms);
    config.payload.small_write_size =
        parse_size(&cli.small_write_size).context("Invalid small write size")?;
    config.payload.large_write_size =
        parse_size(&cli.large_write_size).context("Invalid large write size")?;
    config.payload.pattern = convert_write_pattern(cli.write_pattern);
    config.payload.seed = cli.seed;
    if !cli.phases.is_empty() {
        config.phases = cli.phases.iter().copied().map(convert_phase).collect();
    }
    config.json_output = cli.json_output.clone();

    Ok(config)
}

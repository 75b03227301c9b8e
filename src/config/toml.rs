//! TOML configuration file parsing
//!
//! ```toml
//! target_dir = "/mnt/share/stress"
//! threads = 8
//! duration = 30
//! open_pool_size = 5000
//! phases = ["create", "write-small"]
//!
//! [setup]
//! retries = 20
//! backoff = 0.5
//!
//! [payload]
//! large_write_size = 1048576
//! seed = 42
//! ```

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
///
/// Only flags given on the command line override the file, even when their
/// value equals the CLI default.
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(ref folder) = cli.folder {
        config.target_dir = folder.clone();
    }
    if cli.is_explicit("log") {
        config.log_path = cli.log.clone();
    }
    if cli.is_explicit("threads") {
        config.threads = cli.threads;
    }
    if cli.is_explicit("duration") {
        let secs = cli_convert::parse_duration(&cli.duration).context("Invalid duration")?;
        config.duration = Duration::from_secs(secs);
    }
    if cli.is_explicit("createfiles") {
        config.open_pool_size = cli.createfiles;
    }
    if cli.nocreatefilesnested {
        config.nested_sharding = false;
    }
    if let Some(ref timeout) = cli.join_timeout {
        let secs = cli_convert::parse_duration(timeout).context("Invalid join timeout")?;
        config.join_timeout = Some(Duration::from_secs(secs));
    }
    if cli.is_explicit("setup_retries") {
        config.setup.retries = cli.setup_retries;
    }
    if cli.is_explicit("setup_backoff_ms") {
        config.setup.backoff = Duration::from_millis(cli.setup_backoff_ms);
    }
    if cli.is_explicit("small_write_size") {
        config.payload.small_write_size =
            cli_convert::parse_size(&cli.small_write_size).context("Invalid small write size")?;
    }
    if cli.is_explicit("large_write_size") {
        config.payload.large_write_size =
            cli_convert::parse_size(&cli.large_write_size).context("Invalid large write size")?;
    }
    if cli.is_explicit("write_pattern") {
        config.payload.pattern = cli_convert::convert_write_pattern(cli.write_pattern);
    }
    if cli.seed.is_some() {
        config.payload.seed = cli.seed;
    }
    if !cli.phases.is_empty() {
        config.phases = cli.phases.iter().copied().map(cli_convert::convert_phase).collect();
    }
    if cli.json_output.is_some() {
        config.json_output = cli.json_output.clone();
    }

    Ok(config)
}

//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//! A [`Config`] is built once before the first phase and shared read-only
//! (behind an `Arc`) by the controller and every worker.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::util::buffer::FillPattern;
use crate::util::time::{serde_opt_secs, serde_secs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder where the per-worker directory trees are created
    pub target_dir: PathBuf,
    /// Number of worker threads per phase
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Length of each phase's sampling window
    #[serde(default = "default_duration", with = "serde_secs")]
    pub duration: Duration,
    /// Number of files each worker pre-creates for the open phase
    #[serde(default = "default_open_pool_size")]
    pub open_pool_size: u64,
    /// Shard files into `<seq / 1000>` subdirectories
    #[serde(default = "default_true")]
    pub nested_sharding: bool,
    /// Append-only CSV results log
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Upper bound on the join after stop is signalled (`None` waits forever)
    #[serde(default, with = "serde_opt_secs")]
    pub join_timeout: Option<Duration>,
    #[serde(default)]
    pub setup: SetupConfig,
    #[serde(default)]
    pub payload: PayloadConfig,
    /// Phases to run, always executed in [`PhaseKind::ALL`] order
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseKind>,
    /// Optional JSON summary written after the last phase
    #[serde(default)]
    pub json_output: Option<PathBuf>,
}

/// Directory preparation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// How many times a lingering directory is re-polled after deletion
    #[serde(default = "default_setup_retries")]
    pub retries: u32,
    /// Pause between deletion polls
    #[serde(default = "default_setup_backoff", with = "serde_secs")]
    pub backoff: Duration,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            retries: default_setup_retries(),
            backoff: default_setup_backoff(),
        }
    }
}

/// Write phase payload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadConfig {
    #[serde(default = "default_small_write_size")]
    pub small_write_size: u64,
    #[serde(default = "default_large_write_size")]
    pub large_write_size: u64,
    #[serde(default)]
    pub pattern: FillPattern,
    /// Seed for reproducible random payloads
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            small_write_size: default_small_write_size(),
            large_write_size: default_large_write_size(),
            pattern: FillPattern::default(),
            seed: None,
        }
    }
}

/// One of the four measured operation patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    Create,
    Open,
    WriteSmall,
    WriteLarge,
}

impl PhaseKind {
    /// Execution order of a full run
    pub const ALL: [PhaseKind; 4] = [
        PhaseKind::Create,
        PhaseKind::Open,
        PhaseKind::WriteSmall,
        PhaseKind::WriteLarge,
    ];
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Create => write!(f, "create"),
            PhaseKind::Open => write!(f, "open"),
            PhaseKind::WriteSmall => write!(f, "write-small"),
            PhaseKind::WriteLarge => write!(f, "write-large"),
        }
    }
}

impl Config {
    /// Configuration with every default applied for `target_dir`
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            threads: default_threads(),
            duration: default_duration(),
            open_pool_size: default_open_pool_size(),
            nested_sharding: true,
            log_path: default_log_path(),
            join_timeout: None,
            setup: SetupConfig::default(),
            payload: PayloadConfig::default(),
            phases: default_phases(),
            json_output: None,
        }
    }

    /// Configured phases in execution order, duplicates removed
    pub fn ordered_phases(&self) -> Vec<PhaseKind> {
        PhaseKind::ALL
            .into_iter()
            .filter(|kind| self.phases.contains(kind))
            .collect()
    }
}

fn default_threads() -> usize {
    1
}

fn default_duration() -> Duration {
    Duration::from_secs(60)
}

fn default_open_pool_size() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> PathBuf {
    PathBuf::from("results.csv")
}

fn default_setup_retries() -> u32 {
    10
}

fn default_setup_backoff() -> Duration {
    Duration::from_secs(1)
}

fn default_small_write_size() -> u64 {
    1024
}

fn default_large_write_size() -> u64 {
    10 * 1024 * 1024
}

fn default_phases() -> Vec<PhaseKind> {
    PhaseKind::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("/tmp/x");
        assert_eq!(config.threads, 1);
        assert_eq!(config.duration, Duration::from_secs(60));
        assert_eq!(config.open_pool_size, 10_000);
        assert!(config.nested_sharding);
        assert_eq!(config.log_path, PathBuf::from("results.csv"));
        assert!(config.join_timeout.is_none());
        assert_eq!(config.payload.small_write_size, 1024);
        assert_eq!(config.payload.large_write_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_ordered_phases() {
        let mut config = Config::new("/tmp/x");
        config.phases = vec![PhaseKind::WriteLarge, PhaseKind::Create, PhaseKind::Create];
        assert_eq!(
            config.ordered_phases(),
            vec![PhaseKind::Create, PhaseKind::WriteLarge]
        );
    }
}

//! CLI argument parsing using clap

use clap::parser::ValueSource;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// fsstress - filesystem create/open/write throughput harness
#[derive(Parser, Debug)]
#[command(name = "fsstress")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File to append test results to
    #[arg(short = 'l', long = "log", default_value = "results.csv")]
    pub log: PathBuf,

    /// Folder where tests will occur
    #[arg(short = 'f', long = "folder", required_unless_present = "config")]
    pub folder: Option<PathBuf>,

    /// Number of threads to spawn
    #[arg(short = 't', long, default_value = "1")]
    pub threads: usize,

    /// Length of each phase (e.g., 60, 60s, 5m)
    #[arg(short = 'd', long, default_value = "60")]
    pub duration: String,

    /// Number of files each thread creates for the FileOpens test
    #[arg(short = 'c', long = "createfiles", default_value = "10000")]
    pub createfiles: u64,

    /// Don't shard files into nested folders of at most 1000 files each
    #[arg(short = 'n', long = "nocreatefilesnested")]
    pub nocreatefilesnested: bool,

    /// TOML configuration file (explicit CLI flags override its values)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Give up waiting for workers this long after stop (e.g., 30s, 5m)
    #[arg(long)]
    pub join_timeout: Option<String>,

    /// How many times to re-poll a folder that is still being deleted
    #[arg(long, default_value = "10")]
    pub setup_retries: u32,

    /// Milliseconds between folder deletion polls
    #[arg(long, default_value = "1000")]
    pub setup_backoff_ms: u64,

    /// Payload size for the small write phase (e.g., 1k, 4k)
    #[arg(long, default_value = "1k")]
    pub small_write_size: String,

    /// Payload size for the large write phase (e.g., 10M, 1G)
    #[arg(long, default_value = "10M")]
    pub large_write_size: String,

    /// Pattern used to fill the write payload
    #[arg(long, value_enum, default_value = "random")]
    pub write_pattern: WritePattern,

    /// Seed for a reproducible random payload
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated phases to run (default: all, in fixed order)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub phases: Vec<Phase>,

    /// Write a JSON summary of all phases to this file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Argument ids that were given on the command line
    #[arg(skip)]
    explicit: Vec<String>,
}

/// Measured phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Phase {
    /// Create empty files
    Create,
    /// Reopen (truncate) a fixed pool of files
    Open,
    /// Create files with a small payload
    WriteSmall,
    /// Create files with a large payload
    WriteLarge,
}

/// Write payload fill pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WritePattern {
    /// All zeros
    Zeros,
    /// All ones
    Ones,
    /// Random bytes
    Random,
    /// Sequential pattern
    Sequential,
}

impl Cli {
    /// Parse CLI arguments, reporting parse failures as errors
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse_args_from(std::env::args_os())
    }

    /// Parse from an explicit argument list, remembering which flags were given
    pub fn try_parse_args_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        cli.explicit = matches
            .ids()
            .filter(|id| matches.value_source(id.as_str()) == Some(ValueSource::CommandLine))
            .map(|id| id.as_str().to_string())
            .collect();
        Ok(cli)
    }

    /// Whether the flag behind field `id` was given on the command line
    pub fn is_explicit(&self, id: &str) -> bool {
        self.explicit.iter().any(|given| given == id)
    }

    /// Validate CLI arguments
    ///
    /// `createfiles` is checked by the config validator, which knows whether
    /// the open phase is selected.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.config.is_none() && self.threads == 0 {
            anyhow::bail!("threads must be at least 1");
        }

        Ok(())
    }
}

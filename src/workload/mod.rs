//! Measured workloads
//!
//! A [`Workload`] names a phase and builds one [`OperationBody`] per worker.
//! Building a body is the preparation step: it runs on the controller thread,
//! one worker at a time, before any worker is started, so setup cost never
//! shows up in the measurement.
//!
//! | Operation | Worker directory | Per iteration |
//! |---|---|---|
//! | `Create` | `FileCreates<id>` | create an empty file |
//! | `OpenOverwrite` | `FileOpens<id>` | reopen a pool file with truncate |
//! | `WriteSmall` / `WriteLarge` | `FileCreateWrites<id>` | create a file and write the payload |

pub mod create;
pub mod open;

use crate::config::{Config, PhaseKind};
use crate::target::layout;
use crate::target::tree::{self, DirectoryOps, RetryPolicy};
use crate::util::buffer::Payload;
use crate::worker::OperationBody;
use crate::Result;
use anyhow::Context;
use create::CreateBody;
use open::OpenBody;
use tracing::debug;

/// Phase definition consumed by the timed-run controller
pub trait Workload {
    /// Operation name written to the results log
    fn name(&self) -> String;

    /// Prepare worker `id` and return its operation body
    fn prepare(
        &self,
        id: usize,
        config: &Config,
        dirs: &dyn DirectoryOps,
    ) -> Result<Box<dyn OperationBody>>;
}

/// The four built-in operation patterns
#[derive(Debug, Clone)]
pub enum WorkloadOperation {
    /// Create empty files
    Create,
    /// Reopen a fixed pool of files with truncate
    OpenOverwrite,
    /// Create files and write a small payload into each
    WriteSmall { payload: Payload },
    /// Create files and write a large payload into each
    WriteLarge { payload: Payload },
}

impl WorkloadOperation {
    /// Build the operation for a phase
    ///
    /// Write phases generate their payload here, once, before any worker
    /// directory is prepared.
    pub fn for_phase(kind: PhaseKind, config: &Config) -> Result<Self> {
        let op = match kind {
            PhaseKind::Create => Self::Create,
            PhaseKind::Open => Self::OpenOverwrite,
            PhaseKind::WriteSmall => Self::WriteSmall {
                payload: payload_for(config.payload.small_write_size, config)?,
            },
            PhaseKind::WriteLarge => Self::WriteLarge {
                payload: payload_for(config.payload.large_write_size, config)?,
            },
        };
        Ok(op)
    }

    /// Prefix of the per-worker directories
    pub fn dir_prefix(&self) -> &'static str {
        match self {
            Self::Create => "FileCreates",
            Self::OpenOverwrite => "FileOpens",
            Self::WriteSmall { .. } | Self::WriteLarge { .. } => "FileCreateWrites",
        }
    }

    fn payload(&self) -> Option<&Payload> {
        match self {
            Self::WriteSmall { payload } | Self::WriteLarge { payload } => Some(payload),
            Self::Create | Self::OpenOverwrite => None,
        }
    }
}

fn payload_for(size: u64, config: &Config) -> Result<Payload> {
    let size = usize::try_from(size).context("Payload size does not fit in memory")?;
    Ok(Payload::generate(size, config.payload.pattern, config.payload.seed))
}

impl Workload for WorkloadOperation {
    fn name(&self) -> String {
        match self {
            Self::Create => "FileCreate".to_string(),
            Self::OpenOverwrite => "FileOpens".to_string(),
            Self::WriteSmall { payload } | Self::WriteLarge { payload } => {
                format!("FileCreateWrites({}B)", payload.len())
            }
        }
    }

    fn prepare(
        &self,
        id: usize,
        config: &Config,
        dirs: &dyn DirectoryOps,
    ) -> Result<Box<dyn OperationBody>> {
        let dir = layout::worker_dir(&config.target_dir, self.dir_prefix(), id);
        let nested = config.nested_sharding;

        match self {
            Self::OpenOverwrite => {
                let created = tree::ensure_file_pool(&dir, config.open_pool_size, nested)?;
                debug!(
                    "Worker {} pool ready in {} ({} of {} files created)",
                    id,
                    dir.display(),
                    created,
                    config.open_pool_size
                );
                Ok(Box::new(OpenBody::new(dir, nested, config.open_pool_size)))
            }
            _ => {
                let policy = RetryPolicy {
                    retries: config.setup.retries,
                    backoff: config.setup.backoff,
                };
                tree::clear_directory(dirs, &dir, policy)?;
                Ok(Box::new(CreateBody::new(dir, nested, self.payload().cloned())))
            }
        }
    }
}

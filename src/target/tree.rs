//! Worker directory preparation
//!
//! Clears and recreates worker directories before a phase and pre-populates
//! the open phase's file pool. Some backends (SMB shares, some FUSE drivers)
//! finish a recursive delete in the background, so a directory can still be
//! visible right after `remove_dir_all` returns. Clearing therefore polls a
//! bounded number of times before giving up with [`StressError::Setup`].

use crate::error::StressError;
use crate::target::layout;
use crate::Result;
use anyhow::Context;
use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Directory primitives used while preparing a phase
pub trait DirectoryOps {
    fn exists(&self, path: &Path) -> bool;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`DirectoryOps`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl DirectoryOps for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

/// Retry bound for clearing a directory
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Polls after the first delete attempt
    pub retries: u32,
    /// Pause before each poll
    pub backoff: Duration,
}

/// Remove `path` if present and create it empty
///
/// Returns [`StressError::Setup`] when the directory is still visible after
/// `policy.retries` polls.
pub fn clear_directory(ops: &dyn DirectoryOps, path: &Path, policy: RetryPolicy) -> Result<()> {
    if ops.exists(path) {
        try_remove(ops, path);

        let mut polls = 0;
        while polls < policy.retries && ops.exists(path) {
            thread::sleep(policy.backoff);
            if ops.exists(path) {
                debug!("{} still present, deleting again (poll {})", path.display(), polls + 1);
                try_remove(ops, path);
            }
            polls += 1;
        }

        if ops.exists(path) {
            return Err(StressError::Setup {
                path: path.to_path_buf(),
                attempts: polls + 1,
            }
            .into());
        }
    }

    ops.create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;

    Ok(())
}

/// A failed delete is not fatal by itself; the caller polls for the result
fn try_remove(ops: &dyn DirectoryOps, path: &Path) {
    match ops.remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
    }
}

/// Make sure files `0..pool_size` exist in `dir`
///
/// Existing files are kept so repeated runs reuse the pool. Returns how many
/// files had to be created.
pub fn ensure_file_pool(dir: &Path, pool_size: u64, nested: bool) -> Result<u64> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut created = 0;
    for seq in 0..pool_size {
        if nested && layout::starts_bucket(seq) {
            let bucket = layout::bucket_dir(dir, seq);
            fs::create_dir_all(&bucket)
                .with_context(|| format!("Failed to create directory: {}", bucket.display()))?;
        }

        let path = layout::file_path(dir, seq, nested);
        if !path.exists() {
            fs::File::create(&path)
                .with_context(|| format!("Failed to create pool file: {}", path.display()))?;
            created += 1;
        }
    }

    Ok(created)
}

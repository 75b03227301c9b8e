//! Per-worker directory layout
//!
//! Every worker owns one directory directly under the target folder, named
//! after the phase and the worker id (`FileCreates3`, `FileOpens0`, ...).
//! Inside it files are named by sequence number. With sharding enabled they
//! are spread over numbered bucket directories so that no directory holds
//! more than [`SHARD_WIDTH`] files:
//!
//! ```text
//! <folder>/FileCreates0/0/0 .. <folder>/FileCreates0/0/999
//! <folder>/FileCreates0/1/1000 ..
//! ```

use std::path::{Path, PathBuf};

/// Maximum number of files per bucket directory
pub const SHARD_WIDTH: u64 = 1000;

/// Directory owned by worker `id` for a phase with the given prefix
pub fn worker_dir(root: &Path, prefix: &str, id: usize) -> PathBuf {
    root.join(format!("{}{}", prefix, id))
}

/// Bucket index of a sequence number
#[inline]
pub fn bucket_of(seq: u64) -> u64 {
    seq / SHARD_WIDTH
}

/// Path of file `seq` inside a worker directory
pub fn file_path(dir: &Path, seq: u64, nested: bool) -> PathBuf {
    if nested {
        bucket_dir(dir, seq).join(seq.to_string())
    } else {
        dir.join(seq.to_string())
    }
}

/// Bucket directory holding file `seq`
pub fn bucket_dir(dir: &Path, seq: u64) -> PathBuf {
    dir.join(bucket_of(seq).to_string())
}

/// True when `seq` is the first file of its bucket
#[inline]
pub fn starts_bucket(seq: u64) -> bool {
    seq % SHARD_WIDTH == 0
}

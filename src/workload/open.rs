//! Open/overwrite body

use crate::target::layout;
use crate::worker::OperationBody;
use crate::workload::create::with_path;
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Reopens (with truncate) a fixed pool of pre-created files round-robin
///
/// The pool is built during preparation, so the loop measures the open path
/// without any create cost.
pub struct OpenBody {
    dir: PathBuf,
    nested: bool,
    pool_size: u64,
    opened: u64,
}

impl OpenBody {
    pub fn new(dir: PathBuf, nested: bool, pool_size: u64) -> Self {
        debug_assert!(pool_size > 0, "open pool must not be empty");
        Self {
            dir,
            nested,
            pool_size,
            opened: 0,
        }
    }

    /// Pool slot the next iteration opens
    pub fn next_slot(&self) -> u64 {
        self.opened % self.pool_size
    }
}

impl OperationBody for OpenBody {
    fn iterate(&mut self) -> io::Result<u64> {
        let path = layout::file_path(&self.dir, self.next_slot(), self.nested);
        File::create(&path).map_err(|e| with_path(e, &path))?;

        self.opened += 1;
        Ok(0)
    }
}

//! Create and create-then-write bodies

use crate::target::layout;
use crate::util::buffer::Payload;
use crate::worker::OperationBody;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Creates a new file per iteration, optionally writing a payload into it
///
/// Files are named by a per-worker sequence number. With sharding enabled
/// the bucket directory is created when the sequence enters it.
pub struct CreateBody {
    dir: PathBuf,
    nested: bool,
    payload: Option<Payload>,
    seq: u64,
}

impl CreateBody {
    pub fn new(dir: PathBuf, nested: bool, payload: Option<Payload>) -> Self {
        Self {
            dir,
            nested,
            payload,
            seq: 0,
        }
    }

    /// Sequence number of the next file
    pub fn next_seq(&self) -> u64 {
        self.seq
    }
}

impl OperationBody for CreateBody {
    fn iterate(&mut self) -> io::Result<u64> {
        if self.nested && layout::starts_bucket(self.seq) {
            let bucket = layout::bucket_dir(&self.dir, self.seq);
            fs::create_dir_all(&bucket).map_err(|e| with_path(e, &bucket))?;
        }

        let path = layout::file_path(&self.dir, self.seq, self.nested);
        let mut file = File::create(&path).map_err(|e| with_path(e, &path))?;

        let written = match self.payload {
            Some(ref payload) => {
                file.write_all(payload.as_slice()).map_err(|e| with_path(e, &path))?;
                payload.len() as u64
            }
            None => 0,
        };
        drop(file);

        self.seq += 1;
        Ok(written)
    }
}

/// Attach the offending path to an IO error
pub(crate) fn with_path(err: io::Error, path: &Path) -> io::Error {
    io::Error::new(err.kind(), format!("{}: {}", path.display(), err))
}

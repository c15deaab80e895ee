use std::fs;
use std::path::{Path, PathBuf};

use crate::error::io_at;
use crate::workspace::count_entries;
use crate::StorageError;

/// Flat directory of `<index>_<label>_<code>.jpg` debug frames.
#[derive(Debug)]
pub struct DebugDir {
    path: PathBuf,
    next_index: usize,
}

impl DebugDir {
    /// Open (creating if needed) a debug directory. Numbering continues after
    /// the files already present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(io_at(&path))?;
        let next_index = count_entries(&path, |p| !p.is_dir())? + 1;
        Ok(Self { path, next_index })
    }

    /// Directory the debug copies are written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index the next persisted frame will carry.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Copy `frame` into the directory under the next index.
    pub fn persist(&mut self, frame: &Path, label: &str, code: i64) -> Result<PathBuf, StorageError> {
        let target = self
            .path
            .join(format!("{}_{}_{}.jpg", self.next_index, label, code));
        fs::copy(frame, &target).map_err(io_at(&target))?;
        self.next_index += 1;
        Ok(target)
    }
}

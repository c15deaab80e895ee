use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CAPACITY: usize = 10;

/// FIFO of the most recent photo paths.
///
/// The buffer owns the files it holds: a path evicted to make room is also
/// deleted from disk.
#[derive(Debug)]
pub struct RecencyBuffer {
    capacity: usize,
    paths: VecDeque<PathBuf>,
}

impl RecencyBuffer {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            paths: VecDeque::with_capacity(capacity),
        }
    }

    /// Append `path`, evicting the oldest entry when full. Returns the
    /// evicted path. A failed delete is logged and otherwise ignored.
    pub fn admit(&mut self, path: PathBuf) -> Option<PathBuf> {
        let evicted = if self.paths.len() == self.capacity {
            self.paths.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            if let Err(e) = fs::remove_file(old) {
                log::warn!("could not remove evicted photo {}: {e}", old.display());
            }
        }
        self.paths.push_back(path);
        evicted
    }

    /// Number of photos currently kept.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no photo has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Most photos kept before the oldest is evicted.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// The most recently admitted photo.
    pub fn latest(&self) -> Option<&Path> {
        self.paths.back().map(PathBuf::as_path)
    }
}

impl Default for RecencyBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

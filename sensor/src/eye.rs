use glob::glob;
use std::fs;
use std::path::PathBuf;

use crate::{Camera, CaptureError};

/// Replays image files from disk as if they came from the camera.
pub struct ReplayCamera {
    paths: Vec<PathBuf>,
    index: usize,
}

impl ReplayCamera {
    /// Create a camera that cycles through files matching `pattern` in
    /// lexical order.
    pub fn new(pattern: &str) -> Result<Self, CaptureError> {
        let mut paths: Vec<PathBuf> = glob(pattern)
            .map_err(|e| CaptureError::Driver(format!("bad frame pattern {pattern}: {}", e.msg)))?
            .filter_map(Result::ok)
            .collect();
        if paths.is_empty() {
            return Err(CaptureError::Driver(format!("no frames match {pattern}")));
        }
        paths.sort();
        log::info!("replaying {} frames from {pattern}", paths.len());
        Ok(Self::from_paths(paths))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Camera for ReplayCamera {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        if self.paths.is_empty() {
            return Err(CaptureError::Driver("no frames to replay".into()));
        }
        if self.index >= self.paths.len() {
            self.index = 0;
        }
        let path = &self.paths[self.index];
        self.index += 1;
        fs::read(path).map_err(|e| CaptureError::Driver(format!("{}: {e}", path.display())))
    }
}

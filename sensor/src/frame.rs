use chrono::{DateTime, Local};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::CaptureError;

/// A stored camera capture decoded to 8-bit RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    pub captured_at: DateTime<Local>,
    pub path: PathBuf,
    pub pixels: RgbImage,
}

impl Frame {
    /// Decode the frame stored at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| CaptureError::Io { path: path.clone(), source })?;
        let captured_at = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());
        let pixels = image::load_from_memory(&bytes)
            .map_err(|e| CaptureError::InvalidFrame(format!("{}: {e}", path.display())))?
            .to_rgb8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CaptureError::InvalidFrame(format!("{} is empty", path.display())));
        }
        Ok(Self { captured_at, path, pixels })
    }

    /// Wrap pixels that are already in memory.
    pub fn from_image(path: impl Into<PathBuf>, pixels: RgbImage) -> Self {
        Self {
            captured_at: Local::now(),
            path: path.into(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

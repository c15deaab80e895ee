use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The camera driver failed or is unavailable.
    #[error("camera driver fault: {0}")]
    Driver(String),
    /// The capture is empty or cannot be decoded.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("model error: {0}")]
    Model(String),
}

/// Failure to bring the classifier up at start-up.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse model {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("model has {found} weights, input tensor has {expected} values")]
    Shape { expected: usize, found: usize },
}

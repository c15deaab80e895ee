use memory::StorageError;
use motor::ActuatorError;
use sensor::CaptureError;
use thiserror::Error;
use vision::VisionError;

/// Why one loop iteration, or a whole loop, gave up.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error("reading operator input: {0}")]
    Input(#[from] std::io::Error),
}

/// Failure reported by an image-labeling backend.
#[derive(Debug, Error)]
#[error("recognition failed: {0}")]
pub struct RecognitionError(pub String);

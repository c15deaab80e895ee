//! Turning camera frames into steering scores.
//!
//! [`preprocess`] crops, converts and scales a [`sensor::Frame`] into the
//! fixed-shape [`Tensor`] the lane model was trained on. [`Classifier`] wraps
//! the loaded model behind a single `score` call.

pub mod classifier;
pub mod error;
pub mod preprocess;

pub use classifier::{Classifier, LinearModel, Model};
pub use error::{ModelLoadError, VisionError};
pub use preprocess::{preprocess, preprocess_image, Tensor, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};

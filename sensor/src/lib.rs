//! Camera input for the rover.
//!
//! A [`Camera`] hands back encoded still images. [`FrameSource`] stores each
//! capture as a timestamped file and [`Frame`] decodes a stored capture for
//! the vision pipeline.

pub mod camera;
pub mod error;
pub mod eye;
pub mod frame;

pub use camera::{Camera, CommandCamera, FrameSource};
pub use error::CaptureError;
pub use eye::ReplayCamera;
pub use frame::Frame;

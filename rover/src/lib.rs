//! Driving loops for the lane-following rover.
//!
//! [`Autopilot`] closes the camera → classifier → motor loop, [`Recorder`]
//! captures operator-driven training sequences and [`Watcher`] narrates what
//! the camera sees. The `rover` binary wires them to the command line.

pub mod autopilot;
pub mod config;
pub mod error;
pub mod logging;
pub mod recorder;
pub mod watch;

pub use autopilot::{Autopilot, AutopilotConfig, Step};
pub use config::{AutopilotArgs, CameraArgs, Cli, Mode, RecordArgs, WatchArgs};
pub use error::{LoopError, RecognitionError};
pub use logging::init_logging;
pub use recorder::{Recorder, RecorderConfig, spawn_key_reader};
pub use watch::{BoundingBox, Label, LoggingSpeaker, NoopRecognizer, Recognizer, Speaker, Watcher};

//! Output devices for the rover's two drive motors.
//!
//! A steering score becomes a [`Mapping`] through [`Thresholds`], a
//! [`Command`] becomes line levels through [`LineStates`], and the
//! [`Actuator`] holds those levels for a bounded time before returning the
//! motors to idle.

pub mod actuator;
pub mod command;
pub mod error;
pub mod lines;
pub mod mapper;

pub use actuator::{Actuator, MotorState, StopHandle};
pub use command::Command;
pub use error::{ActuatorError, ThresholdError};
pub use lines::{Level, Line, LineStates, Lines, LoggingLines, MemoryLines};
pub use mapper::{Mapping, Thresholds};

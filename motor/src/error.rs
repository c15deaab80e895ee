use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActuatorError {
    #[error("actuator driver fault: {0}")]
    Driver(String),
    /// A [`StopHandle`](crate::StopHandle) halted the motors and they have
    /// not been resumed.
    #[error("motors halted by stop handle")]
    Halted,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("thresholds must be finite")]
    NotFinite,
    #[error("thresholds must ascend, got forward < {forward_below}, left < {left_below}, right >= {right_from}")]
    Unordered {
        forward_below: f32,
        left_below: f32,
        right_from: f32,
    },
}

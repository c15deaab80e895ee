use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use memory::{DebugDir, Session};
use motor::{Actuator, ActuatorError, Command, Mapping, StopHandle, Thresholds};
use sensor::{Camera, Frame, FrameSource};
use tracing::{error, info, warn};
use vision::{Classifier, preprocess};

use crate::LoopError;

#[derive(Clone, Debug)]
pub struct AutopilotConfig {
    /// How long each steering command is held before stopping.
    pub hold: Duration,
    pub thresholds: Thresholds,
    /// Failed iterations in a row after which `run` gives up. Zero counts
    /// as one.
    pub max_consecutive_failures: usize,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(500),
            thresholds: Thresholds::default(),
            max_consecutive_failures: 3,
        }
    }
}

/// What one autopilot iteration saw and did.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub frame: PathBuf,
    pub score: f32,
    pub mapping: Mapping,
    pub command: Command,
    /// `None` when the debug copy could not be written.
    pub debug: Option<PathBuf>,
}

/// Closed perception-actuation loop.
pub struct Autopilot<C> {
    source: FrameSource<C>,
    classifier: Classifier,
    actuator: Actuator,
    session: Session,
    debug: DebugDir,
    config: AutopilotConfig,
}

impl<C: Camera> Autopilot<C> {
    pub fn new(
        camera: C,
        classifier: Classifier,
        actuator: Actuator,
        session: Session,
        debug: DebugDir,
        config: AutopilotConfig,
    ) -> Self {
        Self {
            source: FrameSource::new(camera),
            classifier,
            actuator,
            session,
            debug,
            config,
        }
    }

    /// Halts the motors from another thread and keeps them halted.
    pub fn stop_handle(&self) -> StopHandle {
        self.actuator.stop_handle()
    }

    /// The motors this loop drives.
    pub fn actuator(&self) -> &Actuator {
        &self.actuator
    }

    /// Directory the captured frames go to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Capture, classify and act once.
    ///
    /// Any capture, decode or model failure returns before the motors are
    /// touched. An unmapped score stops the motors. After a stop handle has
    /// fired this fails with [`ActuatorError::Halted`] instead of driving.
    pub fn step(&mut self) -> Result<Step, LoopError> {
        let frame_path = self.source.capture(&self.session.path)?;
        let frame = Frame::open(&frame_path)?;
        let tensor = preprocess(&frame)?;
        let score = self.classifier.score(&tensor)?;
        let mapping = self.config.thresholds.map(score);
        let command = match mapping {
            Mapping::Command(command) => command,
            Mapping::Unmapped { code } => {
                warn!(score, code, "score outside every band, stopping");
                Command::Stop
            }
        };

        self.actuator.actuate(command, self.config.hold)?;

        let debug = match self.debug.persist(&frame_path, mapping.label(), mapping.code()) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "debug frame not written");
                None
            }
        };
        info!(
            frame = %frame_path.display(),
            score,
            code = mapping.code(),
            %command,
            "autopilot step"
        );
        Ok(Step {
            frame: frame_path,
            score,
            mapping,
            command,
            debug,
        })
    }

    /// Step until `running` is cleared or a stop handle halts the motors.
    /// The flag is read between iterations only; a halt latched during an
    /// iteration keeps that iteration from driving. Returns the number of
    /// successful steps, or the last error once too many iterations failed
    /// in a row.
    pub fn run(&mut self, running: &AtomicBool) -> Result<usize, LoopError> {
        let limit = self.config.max_consecutive_failures.max(1);
        let mut steps = 0;
        let mut failures = 0;
        info!(session = %self.session.path.display(), "autopilot started");
        while running.load(Ordering::SeqCst) {
            match self.step() {
                Ok(_) => {
                    steps += 1;
                    failures = 0;
                }
                Err(LoopError::Actuator(ActuatorError::Halted)) => {
                    info!("motors halted, autopilot stopping");
                    break;
                }
                Err(e) => {
                    failures += 1;
                    error!(error = %e, failures, "autopilot iteration failed");
                    if failures >= limit {
                        return Err(e);
                    }
                }
            }
        }
        Ok(steps)
    }
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::{ActuatorError, Command, LineStates, Lines};

/// What the motors are doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorState {
    Idle,
    Driving(Command),
}

struct Shared {
    lines: Box<dyn Lines>,
    state: MotorState,
    /// Set by a stop handle; refuses further driving until resumed.
    halted: bool,
}

impl Shared {
    fn drive(&mut self, command: Command) -> Result<(), ActuatorError> {
        if self.halted {
            return Err(ActuatorError::Halted);
        }
        self.state = MotorState::Driving(command);
        self.apply(LineStates::for_command(command))
    }

    fn halt(&mut self) -> Result<(), ActuatorError> {
        let result = self.apply(LineStates::IDLE);
        self.state = MotorState::Idle;
        result
    }

    /// Writes every line even when an earlier write fails.
    fn apply(&mut self, states: LineStates) -> Result<(), ActuatorError> {
        let mut first_error = None;
        for (line, level) in states.iter() {
            if let Err(e) = self.lines.set(line, level) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turns commands into timed line states and always returns to idle.
///
/// `actuate` takes `&mut self`, so only one command can be in flight. A
/// [`StopHandle`] may halt the motors from another thread at any time.
pub struct Actuator {
    shared: Arc<Mutex<Shared>>,
}

impl Actuator {
    /// Take ownership of the output lines. The lines are driven low first.
    pub fn new(lines: impl Lines + 'static) -> Self {
        let actuator = Self {
            shared: Arc::new(Mutex::new(Shared {
                lines: Box::new(lines),
                state: MotorState::Idle,
                halted: false,
            })),
        };
        if let Err(e) = actuator.stop() {
            log::warn!("failed to idle lines on start-up: {e}");
        }
        actuator
    }

    /// What the lines are currently driven to.
    pub fn state(&self) -> MotorState {
        lock(&self.shared).state
    }

    /// Whether a [`StopHandle`] has halted the motors since the last resume.
    pub fn is_halted(&self) -> bool {
        lock(&self.shared).halted
    }

    /// Allow driving again after a [`StopHandle::stop`].
    pub fn resume(&self) {
        lock(&self.shared).halted = false;
    }

    /// A handle that can halt these motors from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Drive `command` for `duration`, then drive every line low.
    ///
    /// The stop is issued even if driving the lines failed, and the motors
    /// are idle when this returns. [`Command::Stop`] returns immediately.
    /// Fails with [`ActuatorError::Halted`] without touching the lines while
    /// a stop handle's halt is latched.
    pub fn actuate(&mut self, command: Command, duration: Duration) -> Result<(), ActuatorError> {
        if command == Command::Stop {
            return self.stop();
        }
        log::debug!("actuating {command} for {duration:?}");
        let driven = lock(&self.shared).drive(command);
        if driven == Err(ActuatorError::Halted) {
            return driven;
        }
        if driven.is_ok() {
            thread::sleep(duration);
        }
        let halted = lock(&self.shared).halt();
        driven.and(halted)
    }

    /// Drive every line low immediately. Idempotent.
    pub fn stop(&self) -> Result<(), ActuatorError> {
        lock(&self.shared).halt()
    }
}

impl Drop for Actuator {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("failed to idle lines on shutdown: {e}");
        }
    }
}

/// Cloneable, thread-safe hook that halts the motors.
#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<Mutex<Shared>>,
}

impl StopHandle {
    /// Drive every line low and latch the halt: `actuate` refuses to drive
    /// until [`Actuator::resume`] is called. Idempotent.
    pub fn stop(&self) -> Result<(), ActuatorError> {
        let mut shared = lock(&self.shared);
        shared.halted = true;
        shared.halt()
    }
}

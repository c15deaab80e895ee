use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use memory::{SequenceEntry, SequenceRecord, Session};
use motor::{Actuator, ActuatorError, Command, StopHandle};
use sensor::{Camera, FrameSource};
use tracing::{debug, error, info, warn};

use crate::LoopError;

/// Key that ends a recording session.
const FLUSH_KEY: &str = "z";

#[derive(Clone, Debug)]
pub struct RecorderConfig {
    pub forward_hold: Duration,
    /// Hold for backward, left and right.
    pub turn_hold: Duration,
    pub max_consecutive_failures: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            forward_hold: Duration::from_secs(1),
            turn_hold: Duration::from_millis(500),
            max_consecutive_failures: 3,
        }
    }
}

impl RecorderConfig {
    pub fn hold_for(&self, command: Command) -> Duration {
        match command {
            Command::Forward => self.forward_hold,
            Command::Stop => Duration::ZERO,
            Command::Left | Command::Right | Command::Backward => self.turn_hold,
        }
    }
}

/// Operator-driven capture of photo/action training pairs.
///
/// Each iteration takes a photo, then reads one key from the operator:
/// `w` forward, `s` backward, `a` left, `d` right, `x` stop and `z` to save
/// and finish. Unknown keys record the photo without an action.
pub struct Recorder<C> {
    source: FrameSource<C>,
    actuator: Actuator,
    session: Session,
    record: SequenceRecord,
    config: RecorderConfig,
}

impl<C: Camera> Recorder<C> {
    pub fn new(camera: C, actuator: Actuator, session: Session, config: RecorderConfig) -> Self {
        Self {
            source: FrameSource::new(camera),
            actuator,
            session,
            record: SequenceRecord::new(),
            config,
        }
    }

    pub fn record(&self) -> &SequenceRecord {
        &self.record
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.actuator.stop_handle()
    }

    /// Record until `z`, end of input or a cleared `running` flag, then
    /// write `sequence.json` into the session directory.
    ///
    /// The sequence is written even when the loop fails; the loop error
    /// wins over a write error. Reading `input` blocks, so a cleared flag is
    /// only noticed once the next line arrives; see [`Recorder::run_keys`].
    pub fn run(&mut self, mut input: impl BufRead, running: &AtomicBool) -> Result<PathBuf, LoopError> {
        self.run_with(|| read_key(&mut input), running)
    }

    /// Like [`Recorder::run`], with keys delivered by [`spawn_key_reader`].
    /// A cleared flag ends the wait for the next key within
    /// [`KEY_POLL`].
    pub fn run_keys(&mut self, keys: &Receiver<Vec<u8>>, running: &AtomicBool) -> Result<PathBuf, LoopError> {
        self.run_with(|| wait_key(keys, running), running)
    }

    fn run_with(
        &mut self,
        next_key: impl FnMut() -> io::Result<Option<Vec<u8>>>,
        running: &AtomicBool,
    ) -> Result<PathBuf, LoopError> {
        let outcome = self.drive(next_key, running);
        let written = self.record.write_to(&self.session.path);
        outcome?;
        Ok(written?)
    }

    fn drive(
        &mut self,
        mut next_key: impl FnMut() -> io::Result<Option<Vec<u8>>>,
        running: &AtomicBool,
    ) -> Result<(), LoopError> {
        let limit = self.config.max_consecutive_failures.max(1);
        let mut failures = 0;
        info!(session = %self.session.path.display(), "recording started");

        while running.load(Ordering::SeqCst) {
            let photo = match self.source.capture(&self.session.path) {
                Ok(photo) => {
                    failures = 0;
                    photo
                }
                Err(e) => {
                    failures += 1;
                    error!(error = %e, failures, "capture failed");
                    if failures >= limit {
                        return Err(e.into());
                    }
                    continue;
                }
            };

            let Some(raw) = next_key()? else {
                info!("no further operator input");
                break;
            };
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let line = String::from_utf8_lossy(&raw);
            let key = line.trim();
            if key == FLUSH_KEY {
                break;
            }

            let action = match Command::from_key(key) {
                Some(Command::Stop) => {
                    self.actuator.stop()?;
                    None
                }
                Some(command) => match self.actuator.actuate(command, self.config.hold_for(command)) {
                    Ok(()) => Some(command.label().to_string()),
                    Err(ActuatorError::Halted) => {
                        info!("motors halted, ending recording");
                        break;
                    }
                    Err(e) => return Err(e.into()),
                },
                None => {
                    debug!(key, "no action bound to key");
                    None
                }
            };
            self.record.push(SequenceEntry::new(photo, action));
        }
        Ok(())
    }
}

/// How often [`Recorder::run_keys`] re-checks the running flag while
/// waiting for a key.
pub const KEY_POLL: Duration = Duration::from_millis(100);

/// Read operator lines on a dedicated thread. The channel closes at end of
/// input or on a read error.
pub fn spawn_key_reader(mut input: impl BufRead + Send + 'static) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        loop {
            match read_key(&mut input) {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "operator input failed");
                    break;
                }
            }
        }
    });
    rx
}

fn read_key(input: &mut impl BufRead) -> io::Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// `None` once the reader is gone or `running` is cleared.
fn wait_key(keys: &Receiver<Vec<u8>>, running: &AtomicBool) -> io::Result<Option<Vec<u8>>> {
    loop {
        match keys.recv_timeout(KEY_POLL) {
            Ok(line) => return Ok(Some(line)),
            Err(RecvTimeoutError::Disconnected) => return Ok(None),
            Err(RecvTimeoutError::Timeout) => {
                if !running.load(Ordering::SeqCst) {
                    return Ok(None);
                }
            }
        }
    }
}

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::CaptureError;

/// Timestamp used to name captured frames, e.g. `2024-05-01 14:03:07.123456`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const MAX_NAME_SUFFIX: usize = 64;

/// Driver boundary for the physical camera.
pub trait Camera: Send {
    /// Block until the sensor delivers one encoded still image.
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError>;
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        (**self).capture()
    }
}

/// Stores camera captures as `<timestamp>.jpg` files.
pub struct FrameSource<C> {
    camera: C,
}

impl<C: Camera> FrameSource<C> {
    /// Wrap an owned camera handle.
    pub fn new(camera: C) -> Self {
        Self { camera }
    }

    /// Capture one frame into `dest` and return the stored path.
    ///
    /// Driver faults are returned as-is; there is no retry.
    pub fn capture(&mut self, dest: &Path) -> Result<PathBuf, CaptureError> {
        let bytes = self.camera.capture()?;
        if bytes.is_empty() {
            return Err(CaptureError::InvalidFrame("camera returned no data".into()));
        }
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        for suffix in 0..MAX_NAME_SUFFIX {
            let name = if suffix == 0 {
                format!("{stamp}.jpg")
            } else {
                format!("{stamp}-{suffix}.jpg")
            };
            let path = dest.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_or_discard(file, &path, &bytes)?;
                    log::debug!("captured {} bytes to {}", bytes.len(), path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(CaptureError::Io { path, source }),
            }
        }
        Err(CaptureError::Io {
            path: dest.to_path_buf(),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "no free frame name"),
        })
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }
}

/// Write `bytes` to the freshly created `path`, removing it if the write fails
/// so no truncated frame is left behind.
fn write_or_discard(mut file: impl Write, path: &Path, bytes: &[u8]) -> Result<(), CaptureError> {
    let written = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);
    written.map_err(|source| {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("failed to remove partial frame {}: {e}", path.display());
        }
        CaptureError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Camera driven by an external still-capture program writing JPEG to stdout.
#[derive(Clone, Debug)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whitespace separated command line such as
    /// `libcamera-still -n -o -`. Returns `None` for an empty line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }
}

impl Camera for CommandCamera {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| CaptureError::Driver(format!("{}: {e}", self.program)))?;
        if !output.status.success() {
            return Err(CaptureError::Driver(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(CaptureError::Driver(format!("{} produced no image", self.program)));
        }
        Ok(output.stdout)
    }
}

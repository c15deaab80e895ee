use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use motor::{ThresholdError, Thresholds};
use sensor::{Camera, CaptureError, CommandCamera, ReplayCamera};

use crate::{AutopilotConfig, RecorderConfig};

pub const DEFAULT_CAMERA_CMD: &str = "libcamera-still -n -t 1 -o -";
pub const DEFAULT_MODEL: &str = "../model/lane_navigation_check.json";

/// Camera-driven lane-following rover.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, env = "ROVER_VERBOSE", global = true)]
    pub verbose: bool,
    #[command(flatten)]
    pub camera: CameraArgs,
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Args, Debug, Clone)]
pub struct CameraArgs {
    /// Replay images matching this glob instead of using the camera
    #[arg(long, env = "ROVER_FRAMES", global = true)]
    pub frames: Option<String>,
    /// Still-capture command that writes one encoded image to stdout
    #[arg(long, env = "ROVER_CAMERA_CMD", default_value = DEFAULT_CAMERA_CMD, global = true)]
    pub camera_cmd: String,
}

impl CameraArgs {
    pub fn open(&self) -> Result<Box<dyn Camera>, CaptureError> {
        if let Some(pattern) = &self.frames {
            return Ok(Box::new(ReplayCamera::new(pattern)?));
        }
        CommandCamera::from_command_line(&self.camera_cmd)
            .map(|camera| Box::new(camera) as Box<dyn Camera>)
            .ok_or_else(|| CaptureError::Driver("empty camera command".into()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Drive from classifier predictions
    Autopilot(AutopilotArgs),
    /// Record a keyboard-driven training sequence
    Record(RecordArgs),
    /// Periodically describe what the camera sees
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
pub struct AutopilotArgs {
    /// Trained lane model
    #[arg(long, env = "ROVER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: PathBuf,
    /// Base directory of drive sessions
    #[arg(long, env = "ROVER_DRIVES", default_value = "./drive")]
    pub drives: PathBuf,
    /// Directory for labeled debug frames
    #[arg(long, env = "ROVER_DEBUG_DIR", default_value = "debug")]
    pub debug_dir: PathBuf,
    /// Seconds each command is held
    #[arg(long, env = "ROVER_HOLD", default_value = "0.5", value_parser = parse_seconds)]
    pub hold: Duration,
    #[arg(long, env = "ROVER_FORWARD_BELOW", default_value_t = 3.1)]
    pub forward_below: f32,
    #[arg(long, env = "ROVER_LEFT_BELOW", default_value_t = 3.2)]
    pub left_below: f32,
    #[arg(long, env = "ROVER_RIGHT_FROM", default_value_t = 3.211)]
    pub right_from: f32,
    /// Failed iterations in a row before giving up
    #[arg(long, env = "ROVER_MAX_FAILURES", default_value_t = 3)]
    pub max_failures: usize,
}

impl AutopilotArgs {
    pub fn config(&self) -> Result<AutopilotConfig, ThresholdError> {
        Ok(AutopilotConfig {
            hold: self.hold,
            thresholds: Thresholds::new(self.forward_below, self.left_below, self.right_from)?,
            max_consecutive_failures: self.max_failures,
        })
    }
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Base directory of recording sessions
    #[arg(long, env = "ROVER_SEQUENCES", default_value = "./sequences")]
    pub sequences: PathBuf,
    #[arg(long, env = "ROVER_FORWARD_HOLD", default_value = "1.0", value_parser = parse_seconds)]
    pub forward_hold: Duration,
    #[arg(long, env = "ROVER_TURN_HOLD", default_value = "0.5", value_parser = parse_seconds)]
    pub turn_hold: Duration,
    #[arg(long, env = "ROVER_MAX_FAILURES", default_value_t = 3)]
    pub max_failures: usize,
}

impl RecordArgs {
    pub fn config(&self) -> RecorderConfig {
        RecorderConfig {
            forward_hold: self.forward_hold,
            turn_hold: self.turn_hold,
            max_consecutive_failures: self.max_failures,
        }
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[arg(long, env = "ROVER_PHOTOS", default_value = "photos")]
    pub photos: PathBuf,
    /// Seconds between photos
    #[arg(long, env = "ROVER_INTERVAL", default_value = "5", value_parser = parse_seconds)]
    pub interval: Duration,
    /// Photos kept on disk
    #[arg(long, env = "ROVER_BUFFER", default_value_t = memory::recency::DEFAULT_CAPACITY)]
    pub buffer: usize,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f32 = s.trim().parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    Duration::try_from_secs_f32(secs).map_err(|e| format!("{s:?} is not a duration: {e}"))
}

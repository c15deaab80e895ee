use std::fs;
use std::path::{Path, PathBuf};

use crate::error::io_at;
use crate::StorageError;

/// Prefix of manual recording sessions, `sequence_<N>`.
pub const RECORDING_PREFIX: &str = "sequence";
/// Prefix of autopilot sessions, `drive_<N>`.
pub const DRIVE_PREFIX: &str = "drive";

/// One run's dedicated directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// 1-based position among the sessions under the same base.
    pub ordinal: usize,
    pub path: PathBuf,
}

/// Create `<base>/<prefix>_<N>` where `N` is one more than the number of
/// directories already under `base`. `base` is created when missing.
///
/// Two processes starting at the same moment can pick the same `N`; the
/// second one then fails here.
pub fn create_session(base: &Path, prefix: &str) -> Result<Session, StorageError> {
    fs::create_dir_all(base).map_err(io_at(base))?;
    let ordinal = count_entries(base, Path::is_dir)? + 1;
    let path = base.join(format!("{prefix}_{ordinal}"));
    fs::create_dir(&path).map_err(io_at(&path))?;
    log::info!("created session {}", path.display());
    Ok(Session { ordinal, path })
}

pub(crate) fn count_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<usize, StorageError> {
    let mut count = 0;
    for entry in fs::read_dir(dir).map_err(io_at(dir))? {
        let entry = entry.map_err(io_at(dir))?;
        if keep(&entry.path()) {
            count += 1;
        }
    }
    Ok(count)
}

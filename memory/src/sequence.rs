use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::io_at;
use crate::StorageError;

/// File name of the sequence written into each recording session.
pub const SEQUENCE_FILE: &str = "sequence.json";

/// One photo of a recording, with the action taken after it when the
/// operator's key was recognized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub photo: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl SequenceEntry {
    pub fn new(photo: impl Into<PathBuf>, action: Option<String>) -> Self {
        Self {
            photo: photo.into(),
            action,
        }
    }
}

/// Ordered photo/action pairs of a manual driving session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    sequence: Vec<SequenceEntry>,
}

impl SequenceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SequenceEntry) {
        self.sequence.push(entry);
    }

    pub fn entries(&self) -> &[SequenceEntry] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Write `sequence.json` into `session_dir`, indented by four spaces.
    pub fn write_to(&self, session_dir: &Path) -> Result<PathBuf, StorageError> {
        let path = session_dir.join(SEQUENCE_FILE);
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        fs::write(&path, buf).map_err(io_at(&path))?;
        log::info!("wrote {} entries to {}", self.len(), path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let text = fs::read_to_string(path).map_err(io_at(path))?;
        Ok(serde_json::from_str(&text)?)
    }
}

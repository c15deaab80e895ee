//! On-disk bookkeeping for the rover.
//!
//! Numbered session directories, the flat debug-artifact directory,
//! recorded driving sequences and the bounded buffer of recent photos.

pub mod debug;
pub mod error;
pub mod recency;
pub mod sequence;
pub mod workspace;

pub use debug::DebugDir;
pub use error::StorageError;
pub use recency::RecencyBuffer;
pub use sequence::{SequenceEntry, SequenceRecord};
pub use workspace::{create_session, Session, DRIVE_PREFIX, RECORDING_PREFIX};

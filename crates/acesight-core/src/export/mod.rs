//! Snapshot publication for downstream consumers.

mod presence;
mod snapshot;

pub use presence::PresenceText;
pub use snapshot::{STATE_FILE, STATUS_FILE, SnapshotWriter};

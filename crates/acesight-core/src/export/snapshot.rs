use std::fs;
use std::path::{Path, PathBuf};

use super::PresenceText;
use crate::error::Result;
use crate::session::StateSnapshot;

pub const STATE_FILE: &str = "state.json";
pub const STATUS_FILE: &str = "status.txt";

/// Publishes snapshots as files for dashboards and overlays to poll
///
/// A disabled writer accepts every call and writes nothing.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    enabled: bool,
    base_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(enabled: bool, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            base_dir: base_dir.into(),
        }
    }

    /// Writer for an optional output directory
    pub fn for_output(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(true, dir),
            None => Self::disabled(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write `state.json` and `status.txt`
    pub fn write(&self, snapshot: &StateSnapshot) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        fs::create_dir_all(&self.base_dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        self.write_file(STATE_FILE, &json)?;
        self.write_file(STATUS_FILE, &PresenceText::from_snapshot(snapshot).to_string())?;
        Ok(())
    }

    fn write_file(&self, filename: &str, content: &str) -> Result<()> {
        // Write then rename so readers never see a half-written file
        let path = self.base_dir.join(filename);
        let tmp = self.base_dir.join(format!("{}.tmp", filename));
        fs::write(&tmp, content)?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value as JsonValue;
    use tempfile::TempDir;

    use super::*;
    use crate::config::MapConfigStore;
    use crate::logging::LogBuffer;
    use crate::session::{GameState, MapResolver, SessionStore};

    fn snapshot(state: GameState) -> StateSnapshot {
        let resolver = MapResolver::new(Arc::new(MapConfigStore::builtin()), "Frozen Pass");
        let mut store = SessionStore::new(resolver, LogBuffer::new(10));
        store.state = state;
        store.stats.kills = 3;
        store.snapshot()
    }

    #[test]
    fn test_disabled_writer_is_noop() {
        let writer = SnapshotWriter::new(false, "/nonexistent/acesight");
        assert!(!writer.is_enabled());
        assert!(writer.write(&snapshot(GameState::InGame)).is_ok());
        assert!(!Path::new("/nonexistent/acesight").exists());
    }

    #[test]
    fn test_writes_state_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::for_output(Some(temp_dir.path()));

        writer.write(&snapshot(GameState::InGame)).unwrap();

        let status = fs::read_to_string(temp_dir.path().join(STATUS_FILE)).unwrap();
        assert_eq!(status, "In-Game (Kills: 3)");

        let json = fs::read_to_string(temp_dir.path().join(STATE_FILE)).unwrap();
        let value: JsonValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value["game_state_label"], "In Game");
        assert_eq!(value["stats"]["kills"], 3);
        assert!(!temp_dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("out").join("acesight");
        let writer = SnapshotWriter::new(true, &nested);

        writer.write(&snapshot(GameState::InMenu)).unwrap();
        let status = fs::read_to_string(nested.join(STATUS_FILE)).unwrap();
        assert_eq!(status, "In Main Menu");
    }
}

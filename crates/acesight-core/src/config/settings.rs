use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{FixedRegions, timing, tracking};
use crate::error::{Error, Result};
use crate::tracking::TrackerParams;
use crate::vision::Palette;
use crate::vision::palette::{PING_MARKER_HEX, PLAYER_MARKER_HEX};

/// Runtime settings
///
/// Every field has a default so a partial (or missing) settings file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Executable name of the game process
    pub process_name: String,
    /// Map activated by `bypass`
    pub fallback_map: String,
    pub regions: FixedRegions,
    pub timing: TimingSettings,
    pub tracker: TrackerParams,
    pub markers: MarkerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            process_name: "aces.exe".to_string(),
            fallback_map: "Frozen Pass".to_string(),
            regions: FixedRegions::default(),
            timing: TimingSettings::default(),
            tracker: TrackerParams::default(),
            markers: MarkerSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParseError(e.to_string()))
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Poll cadences and debounce windows, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub detection_poll_ms: u64,
    pub significant_event_delay_ms: u64,
    pub battle_marker_window_ms: u64,
    pub heartbeat_timeout_ms: u64,
    pub process_poll_ms: u64,
    pub map_name_poll_ms: u64,
    pub minimap_poll_ms: u64,
    pub snapshot_interval_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            detection_poll_ms: timing::DETECTION_POLL.as_millis() as u64,
            significant_event_delay_ms: timing::SIGNIFICANT_EVENT_DELAY.as_millis() as u64,
            battle_marker_window_ms: timing::BATTLE_MARKER_WINDOW.as_millis() as u64,
            heartbeat_timeout_ms: timing::HEARTBEAT_TIMEOUT.as_millis() as u64,
            process_poll_ms: timing::PROCESS_POLL.as_millis() as u64,
            map_name_poll_ms: timing::MAP_NAME_POLL.as_millis() as u64,
            minimap_poll_ms: timing::MINIMAP_POLL.as_millis() as u64,
            snapshot_interval_ms: timing::SNAPSHOT_INTERVAL.as_millis() as u64,
        }
    }
}

impl TimingSettings {
    pub fn detection_poll(&self) -> Duration {
        Duration::from_millis(self.detection_poll_ms)
    }

    pub fn significant_event_delay(&self) -> Duration {
        Duration::from_millis(self.significant_event_delay_ms)
    }

    pub fn battle_marker_window(&self) -> Duration {
        Duration::from_millis(self.battle_marker_window_ms)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }

    pub fn process_poll(&self) -> Duration {
        Duration::from_millis(self.process_poll_ms)
    }

    pub fn map_name_poll(&self) -> Duration {
        Duration::from_millis(self.map_name_poll_ms)
    }

    pub fn minimap_poll(&self) -> Duration {
        Duration::from_millis(self.minimap_poll_ms)
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms)
    }
}

/// Marker palettes as hex strings (`"f2c52f"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub player_colors: Vec<String>,
    pub ping_colors: Vec<String>,
    pub tolerance: f64,
}

impl MarkerSettings {
    pub fn player_palette(&self) -> Result<Palette> {
        Palette::from_hex(&self.player_colors)
    }

    pub fn ping_palette(&self) -> Result<Palette> {
        Palette::from_hex(&self.ping_colors)
    }
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            player_colors: PLAYER_MARKER_HEX.iter().map(|s| s.to_string()).collect(),
            ping_colors: PING_MARKER_HEX.iter().map(|s| s.to_string()).collect(),
            tolerance: tracking::COLOR_TOLERANCE,
        }
    }
}

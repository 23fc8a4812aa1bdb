//! Configuration and tuning.
//!
//! This module contains:
//! - `MapConfig` / `MapConfigStore` - per-map minimap calibration loaded from JSON
//! - `Settings` - runtime settings (TOML-friendly, every field defaulted)
//! - `Region` / `RegionLayout` - screen rectangles sampled by the loops
//! - Timing and tracking constants

mod map_config;
mod regions;
mod settings;

pub use map_config::*;
pub use regions::*;
pub use settings::*;

/// Poll cadence and debounce windows for the detection loops.
pub mod timing {
    use std::time::Duration;

    /// Nominal delay between detection loop iterations.
    pub const DETECTION_POLL: Duration = Duration::from_secs(1);

    /// Delay after a combat sample that produced a significant event or module hit.
    ///
    /// The hit animation usually stays on screen for a few seconds; polling
    /// again immediately would count it twice.
    pub const SIGNIFICANT_EVENT_DELAY: Duration = Duration::from_secs(4);

    /// A "to battle" marker seen within this window blocks the `InGame` transition.
    pub const BATTLE_MARKER_WINDOW: Duration = Duration::from_secs(10);

    /// Without a gear heartbeat for this long the game is considered unfocused.
    pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Poll interval while waiting for the game process.
    pub const PROCESS_POLL: Duration = Duration::from_secs(2);

    /// Poll interval of the map-name resolver loop.
    pub const MAP_NAME_POLL: Duration = Duration::from_secs(2);

    /// Poll interval of the minimap tracker loop.
    pub const MINIMAP_POLL: Duration = Duration::from_millis(100);

    /// Poll interval of the minimap loop while paused.
    pub const MINIMAP_PAUSED_POLL: Duration = Duration::from_secs(1);

    /// Snapshot publication interval.
    pub const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(1);
}

/// Minimap marker tracking parameters.
pub mod tracking {
    /// Masks with fewer "on" pixels than this are treated as no detection.
    pub const MIN_PIXEL_COUNT: usize = 2;

    /// Moves up to this many pixels are adopted immediately.
    pub const DISTANCE_THRESHOLD_PX: f64 = 20.0;

    /// Consecutive qualifying far jumps required before the tracker commits.
    pub const STABLE_THRESHOLD: u32 = 3;

    /// A far jump only qualifies when the pixel count grows beyond this ratio.
    pub const GROWTH_RATIO: f64 = 1.5;

    /// Reported marker radius is capped at this many pixels.
    pub const MAX_RADIUS_PX: u32 = 10;

    /// Euclidean RGB tolerance for marker palettes.
    pub const COLOR_TOLERANCE: f64 = 4.0;

    /// Scale readings below this many meters are rejected as misreads.
    pub const MIN_CELL_SIZE_M: f64 = 100.0;
}

/// Bounded log buffer sizes.
pub mod log_buffer {
    /// Lines kept in memory.
    pub const CAPACITY: usize = 1000;

    /// Lines exposed in a state snapshot.
    pub const SNAPSHOT_LINES: usize = 50;
}

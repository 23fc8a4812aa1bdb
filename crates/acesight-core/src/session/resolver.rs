use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::config::{MapConfig, MapConfigStore, tracking};
use crate::error::{Error, Result};
use crate::range::RangeCalculator;
use crate::signal::{OVERLAY_SIGNALS, OverlaySignal};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("valid number regex"));

/// Axis of a grid offset adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Axis {
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "y")]
    Y,
}

/// Transient overlays that make map-name OCR unreliable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverlayFlags {
    pub scoreboard_open: bool,
    pub main_menu_open: bool,
}

impl OverlayFlags {
    /// Classify the overlay region texts
    pub fn detect(scoreboard_text: &str, main_menu_text: &str) -> Self {
        Self {
            scoreboard_open: OVERLAY_SIGNALS.matches(OverlaySignal::Scoreboard, scoreboard_text),
            main_menu_open: OVERLAY_SIGNALS.matches(OverlaySignal::MainMenu, main_menu_text),
        }
    }

    pub fn any(&self) -> bool {
        self.scoreboard_open || self.main_menu_open
    }
}

/// The currently selected calibration plus runtime adjustments
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMap {
    base: Arc<MapConfig>,
    offset_adjust: (i32, i32),
    locked_cell_size_m: Option<f64>,
    /// Follows the base calibration and the locked cell size
    calculator: RangeCalculator,
}

impl ActiveMap {
    fn new(base: Arc<MapConfig>) -> Self {
        let calculator = RangeCalculator::new(&base);
        Self {
            base,
            offset_adjust: (0, 0),
            locked_cell_size_m: None,
            calculator,
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn base(&self) -> &Arc<MapConfig> {
        &self.base
    }

    pub fn offset_adjust(&self) -> (i32, i32) {
        self.offset_adjust
    }

    pub fn cell_size_locked(&self) -> bool {
        self.locked_cell_size_m.is_some()
    }

    /// Converter for the current calibration
    pub fn calculator(&self) -> &RangeCalculator {
        &self.calculator
    }

    pub fn grid_offset(&self) -> (i32, i32) {
        let (dx, dy) = self.offset_adjust;
        (self.base.grid_offset.0 + dx, self.base.grid_offset.1 + dy)
    }

    fn lock_cell_size_m(&mut self, cell_size_m: f64) {
        self.locked_cell_size_m = Some(cell_size_m);
        self.calculator = RangeCalculator::from_cell(self.base.grid_cell_period_px, cell_size_m);
    }

    /// Calibration with offset adjustments and the locked cell size applied
    pub fn effective(&self) -> MapConfig {
        MapConfig {
            name: self.base.name.clone(),
            grid_cell_period_px: self.base.grid_cell_period_px,
            grid_offset: self.grid_offset(),
            cell_size_m: self.locked_cell_size_m.unwrap_or(self.base.cell_size_m),
        }
    }
}

/// Outcome of resolving a map-name sample
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// A different map became active
    Activated(Arc<MapConfig>),
    /// The recognized map is already active
    Unchanged,
    /// No known map name in the text
    NotRecognized,
    /// An overlay is open; the sample was ignored
    Suppressed,
}

/// Outcome of reading the minimap scale label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellSizeReading {
    Locked(f64),
    BelowThreshold(f64),
    NoNumber,
    /// No active map, or the cell size is already locked
    Skipped,
}

/// Maintains the active map calibration
#[derive(Debug, Clone)]
pub struct MapResolver {
    store: Arc<MapConfigStore>,
    fallback_map: String,
    active: Option<ActiveMap>,
    overlays: OverlayFlags,
}

impl MapResolver {
    pub fn new(store: Arc<MapConfigStore>, fallback_map: impl Into<String>) -> Self {
        Self {
            store,
            fallback_map: fallback_map.into(),
            active: None,
            overlays: OverlayFlags::default(),
        }
    }

    pub fn store(&self) -> &Arc<MapConfigStore> {
        &self.store
    }

    pub fn active(&self) -> Option<&ActiveMap> {
        self.active.as_ref()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name())
    }

    pub fn overlays(&self) -> OverlayFlags {
        self.overlays
    }

    pub fn set_overlays(&mut self, overlays: OverlayFlags) {
        if overlays != self.overlays {
            debug!(
                tag = "OCR",
                "overlays changed: scoreboard={}, main_menu={}",
                overlays.scoreboard_open,
                overlays.main_menu_open
            );
        }
        self.overlays = overlays;
    }

    /// Match recognized map-name text against the known maps
    pub fn resolve(&mut self, text: &str) -> ResolveOutcome {
        if self.overlays.any() {
            return ResolveOutcome::Suppressed;
        }
        let Some(config) = self.store.find_in_text(text) else {
            return ResolveOutcome::NotRecognized;
        };
        if self.active_name() == Some(config.name.as_str()) {
            return ResolveOutcome::Unchanged;
        }
        info!(tag = "OCR", "detected map: {}", config.name);
        self.activate(config.clone());
        ResolveOutcome::Activated(config)
    }

    /// Manually select a map by exact name
    pub fn set_manual(&mut self, name: &str) -> Result<Arc<MapConfig>> {
        let name = name.trim();
        let config = self
            .store
            .get(name)
            .ok_or_else(|| Error::UnknownMap(name.to_string()))?;
        info!(tag = "RANGE", "map changed to {}", config.name);
        self.activate(config.clone());
        Ok(config)
    }

    /// Skip recognition and activate the fallback map
    pub fn bypass(&mut self) -> Result<Arc<MapConfig>> {
        let fallback = self.fallback_map.clone();
        let config = self.set_manual(&fallback)?;
        info!(tag = "RANGE", "bypassed OCR, defaulted to {}", config.name);
        Ok(config)
    }

    /// Nudge the grid offset of the active map; returns the new effective offset
    pub fn adjust_offset(&mut self, axis: Axis, delta: i32) -> Option<(i32, i32)> {
        let active = self.active.as_mut()?;
        match axis {
            Axis::X => active.offset_adjust.0 += delta,
            Axis::Y => active.offset_adjust.1 += delta,
        }
        let offset = active.grid_offset();
        info!(tag = "RANGE", "grid offsets updated: ({}, {})", offset.0, offset.1);
        Some(offset)
    }

    /// Parse the scale label and lock the cell size when it is plausible
    pub fn lock_cell_size(&mut self, text: &str) -> CellSizeReading {
        let Some(active) = self.active.as_mut() else {
            return CellSizeReading::Skipped;
        };
        if active.cell_size_locked() {
            return CellSizeReading::Skipped;
        }
        let Some(value) = NUMBER
            .find(text)
            .and_then(|m| m.as_str().parse::<f64>().ok())
        else {
            warn!(tag = "OCR", "no valid cell size found in scale text: {:?}", text.trim());
            return CellSizeReading::NoNumber;
        };
        if value >= tracking::MIN_CELL_SIZE_M {
            active.lock_cell_size_m(value);
            info!(tag = "OCR", "detected solid cell size: {} m (locked)", value);
            CellSizeReading::Locked(value)
        } else {
            warn!(tag = "OCR", "detected cell size ({} m) is below threshold", value);
            CellSizeReading::BelowThreshold(value)
        }
    }

    /// Drop the active map (returning to the menu)
    pub fn clear(&mut self) -> bool {
        let cleared = self.active.take().is_some();
        if cleared {
            info!(tag = "RANGE", "clearing active map configuration");
        }
        cleared
    }

    fn activate(&mut self, config: Arc<MapConfig>) {
        self.active = Some(ActiveMap::new(config));
    }
}

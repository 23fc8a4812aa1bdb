use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::resolver::{MapResolver, OverlayFlags};
use super::state::{GameState, StepOutcome};
use crate::analysis::{EventResult, ModuleResult, StatCounters, StatKind};
use crate::config::log_buffer;
use crate::logging::LogBuffer;
use crate::range::RangeMeasurement;
use crate::signal::ModuleTag;
use crate::tracking::TrackedTarget;

/// Aggregate session state shared by all loops
///
/// Each field group has a single writer:
/// - detection loop: `state`, `stats`, `last_event`, `last_modules`
/// - resolver loop (and manual map commands): `resolver`
/// - minimap loop: `player`, `ping`, `last_range`, `tracking_paused`
#[derive(Debug)]
pub struct SessionStore {
    pub state: GameState,
    pub stats: StatCounters,
    pub last_event: Option<EventResult>,
    pub last_modules: Option<ModuleResult>,
    pub resolver: MapResolver,
    pub player: TrackedTarget,
    pub ping: TrackedTarget,
    pub last_range: Option<RangeMeasurement>,
    pub tracking_paused: bool,
    log: LogBuffer,
}

pub type SharedState = Arc<RwLock<SessionStore>>;

impl SessionStore {
    pub fn new(resolver: MapResolver, log: LogBuffer) -> Self {
        Self {
            state: GameState::WaitingForProcess,
            stats: StatCounters::default(),
            last_event: None,
            last_modules: None,
            resolver,
            player: TrackedTarget::default(),
            ping: TrackedTarget::default(),
            last_range: None,
            tracking_paused: false,
            log,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Apply a state machine step
    pub fn apply_step(&mut self, outcome: &StepOutcome) {
        self.state = outcome.state;
        if outcome.reset_session {
            self.stats.reset_kills();
            self.last_event = None;
            self.last_modules = None;
        }
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let active = self.resolver.active();
        let effective = active.map(|a| a.effective());
        StateSnapshot {
            game_state: self.state,
            game_state_label: self.state.label().to_string(),
            last_event_description: self.last_event.as_ref().map(|e| e.description()),
            last_event_significant: self
                .last_event
                .as_ref()
                .is_some_and(|e| e.is_significant()),
            last_module_tags: self
                .last_modules
                .as_ref()
                .map(|m| m.modules.clone())
                .unwrap_or_default(),
            last_module_description: self.last_modules.as_ref().map(|m| m.description()),
            stats: self.stats,
            recent_log_lines: self.log.recent(log_buffer::SNAPSHOT_LINES),
            last_range_m: self.last_range.map(|r| r.range_m),
            range: self.last_range,
            active_map_name: effective.as_ref().map(|c| c.name.clone()),
            grid_offset: effective.as_ref().map(|c| c.grid_offset),
            cell_size_m: effective.as_ref().map(|c| c.cell_size_m),
            cell_size_locked: active.is_some_and(|a| a.cell_size_locked()),
            overlays: self.resolver.overlays(),
            player: self.player,
            ping: self.ping,
            tracking_paused: self.tracking_paused,
            timestamp: Utc::now(),
        }
    }
}

/// Read guard that survives a panicked writer
pub fn read_state(state: &SharedState) -> RwLockReadGuard<'_, SessionStore> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write guard that survives a panicked writer
pub fn write_state(state: &SharedState) -> RwLockWriteGuard<'_, SessionStore> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Consistent, serializable view of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub game_state: GameState,
    pub game_state_label: String,
    pub last_event_description: Option<String>,
    pub last_event_significant: bool,
    pub last_module_tags: Vec<ModuleTag>,
    pub last_module_description: Option<String>,
    pub stats: StatCounters,
    pub recent_log_lines: Vec<String>,
    pub last_range_m: Option<f64>,
    pub range: Option<RangeMeasurement>,
    pub active_map_name: Option<String>,
    pub grid_offset: Option<(i32, i32)>,
    pub cell_size_m: Option<f64>,
    pub cell_size_locked: bool,
    pub overlays: OverlayFlags,
    pub player: TrackedTarget,
    pub ping: TrackedTarget,
    pub tracking_paused: bool,
    pub timestamp: DateTime<Utc>,
}

impl StateSnapshot {
    /// Counters that differ from an earlier snapshot
    pub fn changed_stats(&self, previous: &StateSnapshot) -> Vec<StatKind> {
        self.stats.changed_since(&previous.stats)
    }
}

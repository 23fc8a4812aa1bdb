use std::time::{Duration, Instant};

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::config::TimingSettings;

/// Session state inferred from the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, IntoStaticStr)]
pub enum GameState {
    #[strum(serialize = "Waiting for process")]
    WaitingForProcess,
    #[strum(serialize = "In Menu")]
    InMenu,
    #[strum(serialize = "In Game")]
    InGame,
    #[strum(serialize = "Game Not In Focus")]
    NotInFocus,
    #[default]
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl GameState {
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// Signals gathered during one detection cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSignals {
    /// Battle region shows the "to battle" marker
    pub battle_marker: bool,
    /// Gear region shows a driving-HUD fragment
    pub gear_heartbeat: bool,
    /// The game window is in the foreground
    pub focused: bool,
}

/// Result of one state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub previous: GameState,
    pub state: GameState,
    /// The menu marker was seen: kill counter and last results must be reset
    pub reset_session: bool,
    /// The hit/kill and module regions should be sampled this cycle
    pub sample_combat: bool,
}

impl StepOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// Timing windows of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTiming {
    pub battle_marker_window: Duration,
    pub heartbeat_timeout: Duration,
    pub idle_delay: Duration,
    pub significant_event_delay: Duration,
}

impl From<&TimingSettings> for StateTiming {
    fn from(timing: &TimingSettings) -> Self {
        Self {
            battle_marker_window: timing.battle_marker_window(),
            heartbeat_timeout: timing.heartbeat_timeout(),
            idle_delay: timing.detection_poll(),
            significant_event_delay: timing.significant_event_delay(),
        }
    }
}

impl Default for StateTiming {
    fn default() -> Self {
        Self::from(&TimingSettings::default())
    }
}

/// Game state machine
///
/// ## Transition Rules
///
/// - The "to battle" marker forces `InMenu` from any state.
/// - Without the marker, every state except `InGame` and `NotInFocus` falls
///   back to `Unknown`.
/// - Losing focus, or no gear heartbeat for longer than the heartbeat
///   timeout, forces `NotInFocus`.
/// - `InGame` requires both no marker within the battle window and a gear
///   heartbeat in the current cycle; with the window clear but no heartbeat
///   the state is `Unknown`.
///
/// Timestamps are passed in so the windows can be exercised without sleeping.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    state: GameState,
    timing: StateTiming,
    last_battle_marker: Option<Instant>,
    last_heartbeat: Instant,
}

impl GameStateMachine {
    pub fn new(timing: StateTiming, now: Instant) -> Self {
        Self {
            state: GameState::WaitingForProcess,
            timing,
            last_battle_marker: None,
            last_heartbeat: now,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn timing(&self) -> &StateTiming {
        &self.timing
    }

    /// The game process disappeared
    pub fn on_process_lost(&mut self) {
        if self.state != GameState::WaitingForProcess {
            warn!(tag = "PROCESS", "game process not found, pausing detection");
        }
        self.state = GameState::WaitingForProcess;
    }

    /// The game process is available; leaving `WaitingForProcess` restarts the heartbeat window
    pub fn on_process_found(&mut self, now: Instant) {
        if self.state == GameState::WaitingForProcess {
            info!(tag = "PROCESS", "game process detected, resuming detection");
            self.state = GameState::Unknown;
            self.last_heartbeat = now;
        }
    }

    /// Advance the machine with the signals of one cycle
    pub fn step(&mut self, signals: CycleSignals, now: Instant) -> StepOutcome {
        let previous = self.state;
        let mut sample_combat = false;

        if signals.battle_marker {
            self.last_battle_marker = Some(now);
            self.last_heartbeat = now;
            self.state = GameState::InMenu;
        } else if !matches!(self.state, GameState::InGame | GameState::NotInFocus) {
            self.state = GameState::Unknown;
        }

        if signals.gear_heartbeat {
            self.last_heartbeat = now;
        }

        let heartbeat_lost = now.saturating_duration_since(self.last_heartbeat)
            > self.timing.heartbeat_timeout;
        if !signals.focused || heartbeat_lost {
            self.state = GameState::NotInFocus;
        } else if self.battle_window_clear(now) {
            if signals.gear_heartbeat {
                self.state = GameState::InGame;
                sample_combat = true;
            } else {
                debug!(tag = "GEAR", "gear info not detected, skipping hit/kill detection");
                self.state = GameState::Unknown;
            }
        } else {
            debug!(tag = "BATTLE", "waiting due to recent 'To Battle!' detection");
        }

        let outcome = StepOutcome {
            previous,
            state: self.state,
            reset_session: signals.battle_marker,
            sample_combat,
        };
        if outcome.changed() {
            info!(tag = "STATE", "{} -> {}", previous, self.state);
        }
        outcome
    }

    /// Delay before the next cycle
    ///
    /// After a combat sample a significant result slows the next poll so the
    /// same on-screen notification is not counted twice.
    pub fn next_delay(&self, outcome: &StepOutcome, significant: bool) -> Duration {
        if outcome.sample_combat && significant {
            self.timing.significant_event_delay
        } else {
            self.timing.idle_delay
        }
    }

    fn battle_window_clear(&self, now: Instant) -> bool {
        self.last_battle_marker.is_none_or(|seen| {
            now.saturating_duration_since(seen) > self.timing.battle_marker_window
        })
    }
}

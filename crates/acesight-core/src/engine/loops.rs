use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::EngineShared;
use crate::analysis::{analyze_event, analyze_modules};
use crate::config::{RegionId, timing};
use crate::range::compute_range;
use crate::session::{
    CellSizeReading, CycleSignals, GameState, GameStateMachine, OverlayFlags, ResolveOutcome,
    StateTiming, read_state, write_state,
};
use crate::shutdown::ShutdownSignal;
use crate::signal::{has_battle_marker, has_gear_heartbeat};
use crate::tracking::TargetTracker;
use crate::vision::{OcrProfile, color_mask};

pub(crate) struct LoopContext {
    pub shared: Arc<EngineShared>,
    pub shutdown: Arc<ShutdownSignal>,
}

impl LoopContext {
    /// Capture, filter and recognize one region; failures read as empty text
    fn read_text(&self, id: RegionId, profile: OcrProfile) -> String {
        let region = self.shared.layout.get(id);
        let frame = match self.shared.screen.capture_region(&region) {
            Ok(frame) => frame,
            Err(e) => {
                debug!(tag = "OCR", "capture of {} failed: {}", id, e);
                return String::new();
            }
        };
        match self
            .shared
            .recognizer
            .recognize_text(&profile.apply(&frame), profile)
        {
            Ok(text) => text,
            Err(e) => {
                debug!(tag = "OCR", "recognition of {} failed: {}", id, e);
                String::new()
            }
        }
    }

    fn game_state(&self) -> GameState {
        read_state(&self.shared.state).state
    }
}

/// Process check, HUD state inference and combat sampling
pub(crate) fn run_detection(ctx: LoopContext) {
    let timing = &ctx.shared.settings.timing;
    let mut machine = GameStateMachine::new(StateTiming::from(timing), Instant::now());
    write_state(&ctx.shared.state).state = machine.state();

    while !ctx.shutdown.is_shutdown() {
        if !ctx.shared.process.is_process_running() {
            machine.on_process_lost();
            write_state(&ctx.shared.state).state = machine.state();
            if ctx.shutdown.wait(timing.process_poll()) {
                break;
            }
            continue;
        }
        machine.on_process_found(Instant::now());

        let battle_text = ctx.read_text(RegionId::Battle, OcrProfile::Grayscale);
        let gear_text = ctx.read_text(RegionId::Gear, OcrProfile::Grayscale);
        let signals = CycleSignals {
            battle_marker: has_battle_marker(&battle_text),
            gear_heartbeat: has_gear_heartbeat(&gear_text),
            focused: ctx.shared.process.is_process_focused(),
        };
        if signals.battle_marker {
            debug!(tag = "BATTLE", "detected 'To Battle!', assuming main menu");
        }

        let outcome = machine.step(signals, Instant::now());

        let mut significant = false;
        if outcome.sample_combat {
            let hit_text = ctx.read_text(RegionId::HitKill, OcrProfile::HitColors);
            let module_text = ctx.read_text(RegionId::Modules, OcrProfile::ModuleRed);
            debug!(tag = "ANALYSIS", "hit/kill text: {:?}", hit_text.trim());

            let mut store = write_state(&ctx.shared.state);
            store.apply_step(&outcome);
            let event = analyze_event(&hit_text, &mut store.stats);
            let modules = analyze_modules(&module_text);
            if event.is_significant() {
                info!(tag = "EVENT", "{}", event.description());
            }
            if modules.is_significant() {
                info!(tag = "MODULE", "{}", modules.description());
            }
            significant = event.is_significant() || modules.is_significant();
            store.last_event = Some(event);
            store.last_modules = Some(modules);
        } else {
            write_state(&ctx.shared.state).apply_step(&outcome);
        }

        if ctx.shutdown.wait(machine.next_delay(&outcome, significant)) {
            break;
        }
    }

    debug!(tag = "PROCESS", "detection loop exited");
}

/// Overlay detection, map-name resolution and scale lock
pub(crate) fn run_resolver(ctx: LoopContext) {
    let poll = ctx.shared.settings.timing.map_name_poll();
    let mut paused = false;

    loop {
        let state = ctx.game_state();
        if state != GameState::WaitingForProcess {
            resolve_cycle(&ctx, state, &mut paused);
        }
        if ctx.shutdown.wait(poll) {
            break;
        }
    }

    debug!(tag = "OCR", "resolver loop exited");
}

fn resolve_cycle(ctx: &LoopContext, state: GameState, paused: &mut bool) {
    let overlays = OverlayFlags::detect(
        &ctx.read_text(RegionId::Scoreboard, OcrProfile::Grayscale),
        &ctx.read_text(RegionId::MainMenu, OcrProfile::Grayscale),
    );
    {
        let mut store = write_state(&ctx.shared.state);
        store.resolver.set_overlays(overlays);
        // The menu clears the map whether or not an overlay is open
        if state == GameState::InMenu {
            store.resolver.clear();
        }
    }

    if overlays.any() {
        if !*paused {
            info!(tag = "OCR", "overlay open, pausing map name detection");
            *paused = true;
        }
        return;
    }
    if *paused {
        info!(tag = "OCR", "overlay closed, resuming map name detection");
        *paused = false;
    }

    if state == GameState::InMenu || !ctx.shared.process.is_process_focused() {
        return;
    }

    let text = ctx.read_text(RegionId::MapName, OcrProfile::Grayscale);
    let outcome = write_state(&ctx.shared.state).resolver.resolve(&text);
    if matches!(outcome, ResolveOutcome::NotRecognized) && !text.trim().is_empty() {
        debug!(tag = "OCR", "no known map in {:?}", text.trim());
    }

    let needs_scale = read_state(&ctx.shared.state)
        .resolver
        .active()
        .is_some_and(|active| !active.cell_size_locked());
    if needs_scale {
        let scale_text = ctx.read_text(RegionId::Scale, OcrProfile::ScaleDigits);
        let reading = write_state(&ctx.shared.state)
            .resolver
            .lock_cell_size(&scale_text);
        if let CellSizeReading::Locked(value) = reading {
            debug!(tag = "RANGE", "cell size locked at {} m", value);
        }
    }
}

/// Why the minimap loop is not tracking this cycle
fn pause_reason(focused: bool, overlays: OverlayFlags, state: GameState) -> Option<&'static str> {
    if !focused {
        Some("game not in focus")
    } else if overlays.scoreboard_open {
        Some("scoreboard open")
    } else if overlays.main_menu_open {
        Some("main menu open")
    } else if state == GameState::InMenu {
        Some("in menu")
    } else if state == GameState::WaitingForProcess {
        Some("waiting for process")
    } else {
        None
    }
}

/// Marker tracking and range computation
pub(crate) fn run_minimap(ctx: LoopContext) {
    let settings = &ctx.shared.settings;
    let tolerance = settings.markers.tolerance;
    let region = ctx.shared.layout.minimap;
    let mut player = TargetTracker::new("player", settings.tracker.clone());
    let mut ping = TargetTracker::new("ping", settings.tracker.clone());
    let mut paused_for: Option<&'static str> = None;

    while !ctx.shutdown.is_shutdown() {
        let (state, overlays) = {
            let store = read_state(&ctx.shared.state);
            (store.state, store.resolver.overlays())
        };
        let focused = ctx.shared.process.is_process_focused();

        if let Some(reason) = pause_reason(focused, overlays, state) {
            if paused_for != Some(reason) {
                info!(tag = "MINIMAP", "tracking paused: {}", reason);
                paused_for = Some(reason);
                write_state(&ctx.shared.state).tracking_paused = true;
            }
            if ctx.shutdown.wait(timing::MINIMAP_PAUSED_POLL) {
                break;
            }
            continue;
        }
        if paused_for.take().is_some() {
            info!(tag = "MINIMAP", "tracking resumed");
        }

        match ctx.shared.screen.capture_region(&region) {
            Ok(frame) => {
                let player_target =
                    player.update(&color_mask(&frame, &ctx.shared.player_palette, tolerance));
                let ping_target =
                    ping.update(&color_mask(&frame, &ctx.shared.ping_palette, tolerance));

                let mut store = write_state(&ctx.shared.state);
                let calculator = store.resolver.active().map(|active| *active.calculator());
                let range =
                    compute_range(player_target.center, ping_target.center, calculator.as_ref());
                if range.map(|r| r.range_m) != store.last_range.map(|r| r.range_m) {
                    if let Some(range) = range {
                        debug!(tag = "RANGE", "range {:.0} m", range.range_m);
                    }
                }
                store.player = player_target;
                store.ping = ping_target;
                store.last_range = range;
                store.tracking_paused = false;
            }
            Err(e) => debug!(tag = "MINIMAP", "minimap capture failed: {}", e),
        }

        if ctx.shutdown.wait(settings.timing.minimap_poll()) {
            break;
        }
    }

    debug!(tag = "MINIMAP", "minimap loop exited");
}

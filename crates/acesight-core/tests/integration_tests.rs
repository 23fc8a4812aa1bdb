//! Integration tests for acesight-core
//!
//! These tests drive several modules together through the public API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use acesight_core::analysis::{NO_SIGNIFICANT_EVENTS, StatCounters, analyze_event, analyze_modules};
use acesight_core::config::{MapConfig, MapConfigStore};
use acesight_core::logging::LogBuffer;
use acesight_core::session::{
    CycleSignals, GameState, GameStateMachine, MapResolver, ResolveOutcome, SessionStore,
    StateTiming,
};
use acesight_core::signal::{has_battle_marker, has_gear_heartbeat};
use acesight_core::vision::{BinaryMask, Point};

const SECOND: Duration = Duration::from_secs(1);

fn builtin_resolver() -> MapResolver {
    MapResolver::new(Arc::new(MapConfigStore::builtin()), "Frozen Pass")
}

/// State machine fed by classified HUD text
mod game_state_tests {
    use super::*;

    fn cycle(battle_text: &str, gear_text: &str, focused: bool) -> CycleSignals {
        CycleSignals {
            battle_marker: has_battle_marker(battle_text),
            gear_heartbeat: has_gear_heartbeat(gear_text),
            focused,
        }
    }

    fn running_machine(now: Instant) -> GameStateMachine {
        let mut machine = GameStateMachine::new(StateTiming::default(), now);
        machine.on_process_found(now);
        machine
    }

    #[test]
    fn test_battle_marker_any_case_resets_kills() {
        for text in ["TO BATTLE!", "to battle", "To BaTtLe!"] {
            let t0 = Instant::now();
            let mut machine = running_machine(t0);
            let mut store = SessionStore::new(builtin_resolver(), LogBuffer::new(10));

            let outcome = machine.step(cycle("", "GEAR 3 65 km/h", true), t0);
            store.apply_step(&outcome);
            analyze_event("crew knocked out", &mut store.stats);
            assert_eq!(store.stats.kills, 1);

            let outcome = machine.step(cycle(text, "", true), t0 + SECOND);
            store.apply_step(&outcome);
            assert_eq!(store.state, GameState::InMenu, "{text}");
            assert_eq!(store.stats.kills, 0);
        }
    }

    #[test]
    fn test_gear_text_enters_game_after_window() {
        let t0 = Instant::now();
        let mut machine = running_machine(t0);
        machine.step(cycle("To Battle!", "", true), t0);

        let outcome = machine.step(cycle("", "GEAR 3 65 km/h", true), t0 + 9 * SECOND);
        assert_eq!(outcome.state, GameState::Unknown);

        let outcome = machine.step(cycle("", "GEAR 3 65 km/h", true), t0 + 11 * SECOND);
        assert_eq!(outcome.state, GameState::InGame);
        assert!(outcome.sample_combat);
    }

    #[test]
    fn test_silent_heartbeat_forces_not_in_focus_while_focused() {
        let t0 = Instant::now();
        let mut machine = running_machine(t0);
        machine.step(cycle("", "GEAR 3 65 km/h", true), t0);

        let outcome = machine.step(cycle("", "Loading", true), t0 + 21 * SECOND);
        assert_eq!(outcome.state, GameState::NotInFocus);
    }
}

/// Event analysis against the combat counters
mod event_tests {
    use super::*;

    #[test]
    fn test_non_penetration_only() {
        let mut stats = StatCounters::new();
        let result = analyze_event("Non-penetration", &mut stats);
        assert_eq!(result.description(), "Non-penetration");
        assert_eq!(stats.non_penetrations, 1);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_crit_and_fuel_explosion() {
        let mut stats = StatCounters::new();
        let result = analyze_event("Critical hit, enemy fuel explosion", &mut stats);
        assert_eq!(
            result.description(),
            "Enemy Critical Hit; Enemy killed by fuel explosion"
        );
        assert_eq!(stats.crits, 1);
        assert_eq!(stats.fuel_explosions, 1);
        assert_eq!(stats.kills, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_garbage_changes_nothing() {
        let mut stats = StatCounters::new();
        let result = analyze_event("~~ ## ..", &mut stats);
        assert_eq!(result.description(), NO_SIGNIFICANT_EVENTS);
        assert_eq!(stats, StatCounters::new());
    }

    #[test]
    fn test_module_list() {
        let result = analyze_modules("Fuel tank\nEngine\nAmmo");
        let labels: Vec<&str> = result.modules.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["Fuel tank", "Engine", "Ammo"]);
        assert_eq!(result.description(), "Fuel tank; Engine; Ammo");
    }
}

/// Tracker and range working on the same minimap masks
mod tracking_tests {
    use acesight_core::range::{RangeCalculator, compute_range};
    use acesight_core::tracking::{TargetTracker, TrackerParams};

    use super::*;

    fn blob(x: i32, y: i32, side: i32) -> BinaryMask {
        let points: Vec<Point> = (x..x + side)
            .flat_map(|px| (y..y + side).map(move |py| Point::new(px, py)))
            .collect();
        BinaryMask::from_points(432, 432, &points)
    }

    #[test]
    fn test_sparse_mask_never_resolves() {
        let mut tracker = TargetTracker::new("ping", TrackerParams::default());
        for x in [10, 200, 400] {
            let mask = BinaryMask::from_points(432, 432, &[Point::new(x, 50)]);
            assert_eq!(tracker.update(&mask).center, None);
        }
    }

    #[test]
    fn test_far_jump_needs_three_qualifying_frames() {
        let mut tracker = TargetTracker::new("player", TrackerParams::default());
        tracker.update(&blob(100, 100, 3));
        // A small move resets the streak
        tracker.update(&blob(101, 100, 3));

        let home = Some(Point::new(102, 101));
        for _ in 0..2 {
            assert_eq!(tracker.update(&blob(300, 300, 5)).center, home);
        }
        assert_eq!(
            tracker.update(&blob(300, 300, 5)).center,
            Some(Point::new(302, 302))
        );
    }

    #[test]
    fn test_tracked_markers_give_range() {
        let mut player = TargetTracker::new("player", TrackerParams::default());
        let mut ping = TargetTracker::new("ping", TrackerParams::default());
        let calculator = RangeCalculator::new(&MapConfig::new("Frozen Pass", 61, (0, 0), 150.0));

        let p = player.update(&blob(100, 100, 3));
        let q = ping.update(&blob(222, 100, 3));
        let range = compute_range(p.center, q.center, Some(&calculator)).unwrap();
        assert!((range.pixel_distance - 122.0).abs() < 1e-9);
        assert!((range.range_m - 300.0).abs() < 1e-9);

        assert!(compute_range(p.center, None, Some(&calculator)).is_none());
        assert!(compute_range(p.center, q.center, None).is_none());
    }
}

/// Map resolution from recognized text
mod resolver_tests {
    use super::*;

    #[test]
    fn test_same_text_twice_is_idempotent() {
        let mut resolver = builtin_resolver();
        assert!(matches!(
            resolver.resolve("Battle of Hürtgen Forest"),
            ResolveOutcome::Activated(_)
        ));
        let before = resolver.active().cloned();
        assert!(matches!(
            resolver.resolve("Battle of Hürtgen Forest"),
            ResolveOutcome::Unchanged
        ));
        assert_eq!(resolver.active().cloned(), before);
    }

    #[test]
    fn test_loaded_configs_drive_resolution() {
        let store = MapConfigStore::parse(
            r#"{
                "Sinai": { "grid_cell_period_px": 60, "cell_size_m": 200, "offset": [0, 0] },
                "Sinai Desert": { "grid_cell_period_px": 58, "cell_size_m": 250, "offset": [2, 1] }
            }"#,
        )
        .unwrap();
        let mut resolver = MapResolver::new(Arc::new(store), "Sinai");

        resolver.resolve("loading... SINAI DESERT");
        assert_eq!(resolver.active_name(), Some("Sinai Desert"));

        resolver.clear();
        resolver.bypass().unwrap();
        assert_eq!(resolver.active_name(), Some("Sinai"));
    }
}

//! Engine tests with mock collaborators
//!
//! The engine runs its real threads against scripted screens; timings are
//! shortened so each test settles within a few hundred milliseconds.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use acesight_core::config::{MapConfigStore, RegionLayout, Settings, TimingSettings};
use acesight_core::engine::{Engine, EngineHandle};
use acesight_core::logging::LogBuffer;
use acesight_core::session::{Axis, GameState, StateSnapshot};
use acesight_core::source::{MockProcess, MockRecognizer, MockScreen};
use acesight_core::vision::{Frame, Palette, Rgb};

const GEAR_TEXT: &str = "GEAR 3 65 km/h";

struct Harness {
    engine: Engine,
    layout: RegionLayout,
    screen: Arc<MockScreen>,
    recognizer: Arc<MockRecognizer>,
    process: Arc<MockProcess>,
}

impl Harness {
    fn new() -> Self {
        let settings = Settings {
            timing: TimingSettings {
                detection_poll_ms: 10,
                significant_event_delay_ms: 20,
                process_poll_ms: 10,
                map_name_poll_ms: 10,
                minimap_poll_ms: 10,
                ..TimingSettings::default()
            },
            ..Settings::default()
        };
        let screen = Arc::new(MockScreen::new(1920, 1080));
        let recognizer = Arc::new(MockRecognizer::new());
        let process = Arc::new(MockProcess::default());
        let engine = Engine::new(
            settings,
            Arc::new(MapConfigStore::builtin()),
            screen.clone(),
            recognizer.clone(),
            process.clone(),
            LogBuffer::new(100),
        )
        .unwrap();
        let layout = engine.layout().clone();

        Self {
            engine,
            layout,
            screen,
            recognizer,
            process,
        }
    }

    fn in_game(self) -> Self {
        self.recognizer.set_text(&self.layout.gear, GEAR_TEXT);
        self
    }
}

/// Poll the snapshot until `check` holds or the timeout expires
fn wait_for(handle: &EngineHandle, check: impl Fn(&StateSnapshot) -> bool) -> StateSnapshot {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = handle.snapshot();
        if check(&snapshot) {
            return snapshot;
        }
        assert!(
            Instant::now() < deadline,
            "condition not reached, last snapshot: {:?}",
            snapshot.game_state
        );
        thread::sleep(Duration::from_millis(5));
    }
}

/// Lifecycle: spawn, stop and restart
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_stop_joins_workers() {
        let harness = Harness::new();
        let mut handle = harness.engine.spawn().unwrap();
        assert!(handle.is_running());

        handle.stop();
        assert!(!handle.is_running());
        assert!(handle.shutdown_signal().is_shutdown());

        // Second stop is a no-op
        handle.stop();
    }

    #[test]
    fn test_restart_keeps_session() {
        let harness = Harness::new().in_game();
        harness
            .recognizer
            .set_text(&harness.layout.hit_kill, "Enemy crew knocked out");

        let mut handle = harness.engine.spawn().unwrap();
        let first = wait_for(&handle, |s| s.stats.kills >= 1);
        handle.stop();

        let restarted = harness.engine.spawn().unwrap();
        assert!(!restarted.shutdown_signal().is_shutdown());
        let snapshot = wait_for(&restarted, |s| s.stats.kills > first.stats.kills);
        assert!(snapshot.stats.kills > first.stats.kills);
    }

    #[test]
    fn test_drop_stops_engine() {
        let harness = Harness::new();
        let signal = {
            let handle = harness.engine.spawn().unwrap();
            handle.shutdown_signal()
        };
        assert!(signal.is_shutdown());
    }
}

/// Detection loop behaviour
mod detection_tests {
    use super::*;

    #[test]
    fn test_waiting_for_process() {
        let harness = Harness::new();
        harness.process.set_running(false);
        let handle = harness.engine.spawn().unwrap();
        wait_for(&handle, |s| s.game_state == GameState::WaitingForProcess);

        harness.process.set_running(true);
        wait_for(&handle, |s| s.game_state != GameState::WaitingForProcess);
    }

    #[test]
    fn test_in_game_samples_combat() {
        let harness = Harness::new().in_game();
        harness
            .recognizer
            .set_text(&harness.layout.hit_kill, "Critical hit, enemy fuel explosion");
        harness
            .recognizer
            .set_text(&harness.layout.modules, "Engine");

        let handle = harness.engine.spawn().unwrap();
        let snapshot = wait_for(&handle, |s| s.stats.crits >= 1);
        assert_eq!(snapshot.game_state, GameState::InGame);
        assert_eq!(snapshot.stats.crits, snapshot.stats.fuel_explosions);
        assert_eq!(snapshot.stats.hits, 0);

        let snapshot = wait_for(&handle, |s| s.last_module_description.is_some());
        assert_eq!(snapshot.last_module_description.as_deref(), Some("Engine"));
    }

    #[test]
    fn test_battle_marker_resets_session() {
        let harness = Harness::new().in_game();
        harness
            .recognizer
            .set_text(&harness.layout.hit_kill, "Enemy crew knocked out");

        let handle = harness.engine.spawn().unwrap();
        wait_for(&handle, |s| s.stats.kills >= 1);
        handle.set_map("Poland").unwrap();

        harness
            .recognizer
            .set_text(&harness.layout.battle, "TO BATTLE!");
        let snapshot = wait_for(&handle, |s| {
            s.game_state == GameState::InMenu && s.active_map_name.is_none()
        });
        assert_eq!(snapshot.stats.kills, 0);
        assert!(snapshot.last_event_description.is_none());
    }

    #[test]
    fn test_menu_clears_map_while_overlay_open() {
        let harness = Harness::new().in_game();
        let handle = harness.engine.spawn().unwrap();
        wait_for(&handle, |s| s.game_state == GameState::InGame);
        handle.set_map("Poland").unwrap();

        harness
            .recognizer
            .set_text(&harness.layout.main_menu, "MAIN MENU");
        let snapshot = wait_for(&handle, |s| s.overlays.main_menu_open);
        assert_eq!(snapshot.active_map_name.as_deref(), Some("Poland"));

        harness
            .recognizer
            .set_text(&harness.layout.battle, "TO BATTLE!");
        let snapshot = wait_for(&handle, |s| {
            s.game_state == GameState::InMenu && s.active_map_name.is_none()
        });
        assert!(snapshot.overlays.main_menu_open);
        assert!(!snapshot.cell_size_locked);
    }

    #[test]
    fn test_focus_loss() {
        let harness = Harness::new().in_game();
        let handle = harness.engine.spawn().unwrap();
        wait_for(&handle, |s| s.game_state == GameState::InGame);

        harness.process.set_focused(false);
        wait_for(&handle, |s| s.game_state == GameState::NotInFocus);
    }

    #[test]
    fn test_capture_failure_is_no_signal() {
        let harness = Harness::new().in_game();
        harness.screen.set_failing(true);
        let handle = harness.engine.spawn().unwrap();

        // Empty gear text every cycle: never in game, never crashes
        wait_for(&handle, |s| s.game_state == GameState::Unknown);
        thread::sleep(Duration::from_millis(50));
        assert!(harness.screen.capture_count() > 0);
        assert_ne!(handle.game_state(), GameState::InGame);
    }
}

/// Map resolution and minimap tracking
mod minimap_tests {
    use super::*;

    fn draw_blob(frame: &mut Frame, x: u32, y: u32, color: Rgb) {
        for px in x..x + 3 {
            for py in y..y + 3 {
                frame.set(px, py, color);
            }
        }
    }

    #[test]
    fn test_map_name_and_scale_lock() {
        let harness = Harness::new().in_game();
        harness
            .recognizer
            .set_text(&harness.layout.map_name, "FROZEN PASS");
        harness.recognizer.set_text(&harness.layout.scale, "175");

        let handle = harness.engine.spawn().unwrap();
        let snapshot = wait_for(&handle, |s| s.cell_size_locked);
        assert_eq!(snapshot.active_map_name.as_deref(), Some("Frozen Pass"));
        assert_eq!(snapshot.cell_size_m, Some(175.0));
    }

    #[test]
    fn test_range_between_markers() {
        let harness = Harness::new().in_game();
        harness.recognizer.set_text(&harness.layout.scale, "150");

        let mut frame = Frame::filled(432, 432, Rgb::BLACK);
        draw_blob(&mut frame, 100, 100, Palette::player_marker().colors()[0]);
        draw_blob(&mut frame, 161, 100, Palette::ping_marker().colors()[0]);
        harness.screen.push_frame(harness.layout.minimap, frame);

        let handle = harness.engine.spawn().unwrap();
        handle.set_map("Frozen Pass").unwrap();

        let snapshot = wait_for(&handle, |s| s.last_range_m.is_some());
        let range = snapshot.last_range_m.unwrap();
        assert!((range - 150.0).abs() < 1e-9, "range {range}");
        assert!(snapshot.player.is_resolved());
        assert!(!snapshot.tracking_paused);

        assert_eq!(handle.adjust_offset(Axis::X, 2), Some((3, -3)));
        assert_eq!(handle.snapshot().grid_offset, Some((3, -3)));
    }

    #[test]
    fn test_scoreboard_pauses_tracking() {
        let harness = Harness::new().in_game();
        harness
            .recognizer
            .set_text(&harness.layout.scoreboard, "Battle Statistics");

        let handle = harness.engine.spawn().unwrap();
        let snapshot = wait_for(&handle, |s| s.tracking_paused);
        assert!(snapshot.overlays.scoreboard_open);
    }

    #[test]
    fn test_unknown_manual_map_rejected() {
        let harness = Harness::new();
        let handle = harness.engine.spawn().unwrap();
        assert!(handle.set_map("Atlantis").is_err());
        assert!(handle.snapshot().active_map_name.is_none());

        let config = handle.bypass().unwrap();
        assert_eq!(config.name, "Frozen Pass");
    }
}

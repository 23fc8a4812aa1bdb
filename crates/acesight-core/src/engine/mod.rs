//! Orchestration: the polling loops and their lifecycle.
//!
//! Three workers share one [`SessionStore`]:
//!
//! - **detection**: process check, battle/gear OCR, state machine, combat sampling
//! - **resolver**: overlay and map-name OCR, scale lock
//! - **minimap**: marker masks, target tracking, range
//!
//! Each field group of the store has exactly one writing loop. Every sleep is
//! a [`ShutdownSignal::wait`], so [`EngineHandle::stop`] returns within one
//! polling interval.

mod loops;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::config::{MapConfig, MapConfigStore, RegionLayout, Settings};
use crate::error::Result;
use crate::logging::LogBuffer;
use crate::session::{
    Axis, GameState, MapResolver, SessionStore, SharedState, StateSnapshot, read_state,
    write_state,
};
use crate::shutdown::ShutdownSignal;
use crate::source::{ProcessMonitor, ScreenCapture, TextRecognizer};
use crate::vision::Palette;

use loops::LoopContext;

/// Everything the loops need that outlives a single run
pub(crate) struct EngineShared {
    pub settings: Settings,
    pub layout: RegionLayout,
    pub player_palette: Palette,
    pub ping_palette: Palette,
    pub screen: Arc<dyn ScreenCapture>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub process: Arc<dyn ProcessMonitor>,
    pub state: SharedState,
}

/// Configured engine; spawn it to start the loops
///
/// The session store belongs to the engine, so counters and the active map
/// survive a stop/spawn cycle.
pub struct Engine {
    shared: Arc<EngineShared>,
}

impl Engine {
    /// Validate the configuration against the screen and build the store
    ///
    /// Fails when the screen size cannot be read, a region does not fit the
    /// screen, or a marker palette is malformed.
    pub fn new(
        settings: Settings,
        maps: Arc<MapConfigStore>,
        screen: Arc<dyn ScreenCapture>,
        recognizer: Arc<dyn TextRecognizer>,
        process: Arc<dyn ProcessMonitor>,
        log: LogBuffer,
    ) -> Result<Self> {
        let (width, height) = screen.screen_size()?;
        let layout = RegionLayout::for_screen(width, height, &settings.regions);
        layout.validate(width, height)?;
        info!(tag = "REGION", "screen {}x{}, regions validated", width, height);

        let player_palette = settings.markers.player_palette()?;
        let ping_palette = settings.markers.ping_palette()?;

        let resolver = MapResolver::new(maps, settings.fallback_map.clone());
        let state = SessionStore::new(resolver, log).into_shared();

        Ok(Self {
            shared: Arc::new(EngineShared {
                settings,
                layout,
                player_palette,
                ping_palette,
                screen,
                recognizer,
                process,
                state,
            }),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    pub fn layout(&self) -> &RegionLayout {
        &self.shared.layout
    }

    pub fn state(&self) -> SharedState {
        self.shared.state.clone()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        read_state(&self.shared.state).snapshot()
    }

    /// Start the loops with a fresh shutdown signal
    pub fn spawn(&self) -> Result<EngineHandle> {
        let shutdown = Arc::new(ShutdownSignal::new());
        let mut handle = EngineHandle {
            shutdown: shutdown.clone(),
            workers: Vec::with_capacity(3),
            state: self.shared.state.clone(),
        };

        let workers: [(&str, fn(LoopContext)); 3] = [
            ("detection", loops::run_detection),
            ("resolver", loops::run_resolver),
            ("minimap", loops::run_minimap),
        ];
        for (name, body) in workers {
            let ctx = LoopContext {
                shared: self.shared.clone(),
                shutdown: shutdown.clone(),
            };
            // Dropping `handle` on error stops the workers already started
            let worker = thread::Builder::new()
                .name(format!("acesight-{}", name))
                .spawn(move || body(ctx))?;
            handle.workers.push(worker);
        }

        info!(tag = "PROCESS", "engine started");
        Ok(handle)
    }
}

/// Running engine
///
/// Dropping the handle stops the loops and waits for them.
pub struct EngineHandle {
    shutdown: Arc<ShutdownSignal>,
    workers: Vec<JoinHandle<()>>,
    state: SharedState,
}

impl EngineHandle {
    /// Signal every loop and wait for all of them to exit
    pub fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shutdown.trigger();
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("worker").to_string();
            if worker.join().is_err() {
                warn!(tag = "PROCESS", "{} loop panicked", name);
            }
        }
        info!(tag = "PROCESS", "engine stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    pub fn shutdown_signal(&self) -> Arc<ShutdownSignal> {
        self.shutdown.clone()
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn game_state(&self) -> GameState {
        read_state(&self.state).state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        read_state(&self.state).snapshot()
    }

    /// Manually activate a map by name
    pub fn set_map(&self, name: &str) -> Result<Arc<MapConfig>> {
        write_state(&self.state).resolver.set_manual(name)
    }

    /// Activate the fallback map without recognition
    pub fn bypass(&self) -> Result<Arc<MapConfig>> {
        write_state(&self.state).resolver.bypass()
    }

    /// Nudge the active map's grid offset; `None` without an active map
    pub fn adjust_offset(&self, axis: Axis, delta: i32) -> Option<(i32, i32)> {
        write_state(&self.state).resolver.adjust_offset(axis, delta)
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Main tracking mode command.

use std::path::PathBuf;
use std::sync::Arc;

use acesight_core::{
    Engine, GdiScreenCapture, LogBuffer, ProcessMonitor, ScreenCapture, Settings, ShutdownSignal,
    SnapshotWriter, StateSnapshot, SystemProcessMonitor,
};
use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use tracing::{debug, error, info, warn};

use crate::cli_utils::load_maps;
use crate::ocr::TesseractRecognizer;
use crate::replay::{ReplayCapture, ReplayProcess};

/// Options of the default command
pub struct RunOptions {
    pub maps: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub map: Option<String>,
    pub output: Option<PathBuf>,
    pub replay: Option<PathBuf>,
}

/// Run the main tracking mode
pub fn run(options: RunOptions, log: LogBuffer) -> Result<()> {
    let shutdown = setup_shutdown_handler()?;

    let settings = match options.settings.as_deref() {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let maps = Arc::new(load_maps(options.maps.as_deref())?);
    if let Some(name) = options.map.as_deref()
        && maps.get(name).is_none()
    {
        bail!("map '{}' not found (known: {})", name, maps.names().join(", "));
    }

    let recognizer = Arc::new(TesseractRecognizer::detect()?);
    let (screen, process): (Arc<dyn ScreenCapture>, Arc<dyn ProcessMonitor>) =
        match options.replay.as_deref() {
            Some(dir) => {
                println!("Replaying frames from {}", dir.display());
                (Arc::new(ReplayCapture::open(dir, &settings)?), Arc::new(ReplayProcess))
            }
            None => (
                Arc::new(GdiScreenCapture::new()),
                Arc::new(SystemProcessMonitor::new(settings.process_name.clone())),
            ),
        };

    let process_name = settings.process_name.clone();
    let engine = Engine::new(settings, maps, screen, recognizer, process.clone(), log)
        .context("unsupported display configuration")?;
    let writer = SnapshotWriter::for_output(options.output.as_deref());
    if writer.is_enabled() {
        info!(tag = "PROCESS", "publishing snapshots to {}", writer.base_dir().display());
    }

    println!("Waiting for {}... (Press Ctrl+C to quit)", process_name);

    while !shutdown.is_shutdown() {
        if process.is_process_running() {
            println!("Connected to {}", process_name);
            if let Err(e) = run_session(&engine, &*process, &writer, &shutdown, options.map.as_deref())
            {
                error!(tag = "PROCESS", "session error: {}", e);
            }
            if !shutdown.is_shutdown() {
                println!("Waiting for {}...", process_name);
            }
        }

        if shutdown.wait(engine.settings().timing.process_poll()) {
            break;
        }
    }

    println!("Shutdown complete.");
    Ok(())
}

/// Setup graceful shutdown handler with Ctrl+C
fn setup_shutdown_handler() -> Result<Arc<ShutdownSignal>> {
    let shutdown = Arc::new(ShutdownSignal::new());

    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\nShutting down...");
        shutdown_ctrlc.trigger();
    })?;

    println!("acesight v{}", env!("CARGO_PKG_VERSION"));
    Ok(shutdown)
}

/// Run the engine until the process disappears or shutdown is requested
fn run_session(
    engine: &Engine,
    process: &dyn ProcessMonitor,
    writer: &SnapshotWriter,
    shutdown: &ShutdownSignal,
    manual_map: Option<&str>,
) -> Result<()> {
    let mut handle = engine.spawn()?;
    if let Some(name) = manual_map {
        let config = handle.set_map(name)?;
        println!("Map set to {}", config.name.bold());
    }

    let interval = engine.settings().timing.snapshot_interval();
    let mut previous: Option<StateSnapshot> = None;
    while !shutdown.wait(interval) {
        let snapshot = handle.snapshot();
        if let Err(e) = writer.write(&snapshot) {
            warn!(tag = "PROCESS", "failed to write snapshot: {}", e);
        }
        print_changes(previous.as_ref(), &snapshot);
        previous = Some(snapshot);

        if !process.is_process_running() {
            println!("{}", "Game process lost".yellow());
            break;
        }
    }

    handle.stop();
    debug!(tag = "PROCESS", "session ended");
    Ok(())
}

/// Print what changed since the previous snapshot
fn print_changes(previous: Option<&StateSnapshot>, current: &StateSnapshot) {
    let Some(previous) = previous else {
        println!("State: {}", current.game_state_label.bold());
        return;
    };

    if previous.game_state != current.game_state {
        println!("State: {}", current.game_state_label.bold());
    }
    if previous.active_map_name != current.active_map_name {
        match &current.active_map_name {
            Some(name) => println!("Map: {}", name.cyan()),
            None => println!("Map: {}", "none".dimmed()),
        }
    }

    let changed = current.changed_stats(previous);
    if !changed.is_empty() {
        let counters: Vec<String> = changed
            .iter()
            .map(|kind| format!("{}={}", kind.name(), current.stats.get(*kind)))
            .collect();
        let event = current.last_event_description.as_deref().unwrap_or_default();
        println!("{}  [{}]", event.green(), counters.join(", ").cyan());
    }

    if previous.last_range_m != current.last_range_m
        && let Some(range) = current.last_range_m
    {
        println!("Range: {}", format!("{:.0} m", range).bold());
    }
}

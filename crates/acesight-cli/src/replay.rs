//! Recorded-frame replay in place of the live screen.
//!
//! A replay directory holds PNG or BMP frames named after the region they
//! show: `battle.png`, or a sequence `minimap_000.png`, `minimap_001.png`, ...
//! A full 1920x1080 screenshot named after a region is cropped to it.
//! Each capture returns the next frame of the region and wraps around.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use acesight_core::config::{Region, RegionLayout, Settings};
use acesight_core::vision::Frame;
use acesight_core::{Error, ProcessMonitor, ScreenCapture};
use anyhow::{Context, Result, bail};
use tracing::{info, warn};

/// Screen size the recorded regions are laid out for
pub const REPLAY_SCREEN: (u32, u32) = (1920, 1080);

/// Image formats accepted in a replay directory
const FRAME_EXTENSIONS: &[&str] = &["png", "bmp"];

struct FrameSequence {
    frames: Vec<Frame>,
    next: usize,
}

/// Screen capture serving recorded frames
pub struct ReplayCapture {
    sequences: Mutex<HashMap<Region, FrameSequence>>,
}

impl ReplayCapture {
    pub fn open(dir: &Path, settings: &Settings) -> Result<Self> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("failed to read replay directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_frame_file(path))
            .collect();
        files.sort();

        let layout = RegionLayout::for_screen(REPLAY_SCREEN.0, REPLAY_SCREEN.1, &settings.regions);
        let mut sequences = HashMap::new();
        for (id, region) in layout.regions() {
            let mut frames = Vec::new();
            for path in files.iter().filter(|path| belongs_to(path, id.name())) {
                let mut frame = Frame::open(path)
                    .with_context(|| format!("invalid frame {}", path.display()))?;
                if (frame.width(), frame.height()) == REPLAY_SCREEN {
                    frame = frame.crop(
                        region.left as u32,
                        region.top as u32,
                        region.width,
                        region.height,
                    );
                } else if (frame.width(), frame.height()) != (region.width, region.height) {
                    warn!(
                        tag = "REGION",
                        "{} is {}x{}, region {} is {}x{}",
                        path.display(),
                        frame.width(),
                        frame.height(),
                        id,
                        region.width,
                        region.height
                    );
                }
                frames.push(frame);
            }
            if !frames.is_empty() {
                info!(tag = "REGION", "replay: {} frame(s) for {}", frames.len(), id);
                sequences.insert(region, FrameSequence { frames, next: 0 });
            }
        }

        if sequences.is_empty() {
            bail!("no region frames (*.png, *.bmp) found in {}", dir.display());
        }
        Ok(Self {
            sequences: Mutex::new(sequences),
        })
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

/// `battle.png` and `battle_003.png` belong to `battle`
fn belongs_to(path: &Path, region_name: &str) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    stem == region_name
        || stem
            .strip_prefix(region_name)
            .is_some_and(|rest| rest.starts_with('_'))
}

impl ScreenCapture for ReplayCapture {
    fn screen_size(&self) -> acesight_core::Result<(u32, u32)> {
        Ok(REPLAY_SCREEN)
    }

    fn capture_region(&self, region: &Region) -> acesight_core::Result<Frame> {
        let mut sequences = self
            .sequences
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let sequence = sequences.get_mut(region).ok_or_else(|| {
            Error::CaptureFailed(format!(
                "no replay frames for region at ({}, {})",
                region.left, region.top
            ))
        })?;
        let frame = sequence.frames[sequence.next].clone();
        sequence.next = (sequence.next + 1) % sequence.frames.len();
        Ok(frame)
    }
}

/// Process monitor for replays: the game always runs and has focus
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayProcess;

impl ProcessMonitor for ReplayProcess {
    fn is_process_running(&self) -> bool {
        true
    }

    fn is_process_focused(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use acesight_core::vision::Rgb;

    use super::*;

    fn write_frame(dir: &Path, name: &str, frame: &Frame) {
        frame.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_belongs_to() {
        assert!(belongs_to(Path::new("battle.png"), "battle"));
        assert!(belongs_to(Path::new("minimap_001.bmp"), "minimap"));
        assert!(!belongs_to(Path::new("battleground.png"), "battle"));
        assert!(!belongs_to(Path::new("map_name.png"), "main_menu"));
    }

    #[test]
    fn test_frame_file_extensions() {
        assert!(is_frame_file(Path::new("gear.png")));
        assert!(is_frame_file(Path::new("gear_001.BMP")));
        assert!(!is_frame_file(Path::new("gear.ppm")));
        assert!(!is_frame_file(Path::new("notes")));
    }

    #[test]
    fn test_replay_cycles_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "gear_000.png", &Frame::filled(250, 100, Rgb::WHITE));
        write_frame(dir.path(), "gear_001.bmp", &Frame::filled(250, 100, Rgb::BLACK));

        let settings = Settings::default();
        let capture = ReplayCapture::open(dir.path(), &settings).unwrap();
        let layout = RegionLayout::for_screen(1920, 1080, &settings.regions);

        let colors: Vec<Option<Rgb>> = (0..3)
            .map(|_| capture.capture_region(&layout.gear).unwrap().get(0, 0))
            .collect();
        assert_eq!(colors, vec![Some(Rgb::WHITE), Some(Rgb::BLACK), Some(Rgb::WHITE)]);

        assert!(capture.capture_region(&layout.minimap).is_err());
    }

    #[test]
    fn test_full_screenshot_is_cropped_to_region() {
        let settings = Settings::default();
        let layout = RegionLayout::for_screen(1920, 1080, &settings.regions);
        let minimap = layout.minimap;

        let mut screen = Frame::filled(REPLAY_SCREEN.0, REPLAY_SCREEN.1, Rgb::BLACK);
        screen.set(minimap.left as u32 + 5, minimap.top as u32 + 7, Rgb::WHITE);
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "minimap.png", &screen);

        let capture = ReplayCapture::open(dir.path(), &settings).unwrap();
        let frame = capture.capture_region(&minimap).unwrap();
        assert_eq!((frame.width(), frame.height()), (minimap.width, minimap.height));
        assert_eq!(frame.get(5, 7), Some(Rgb::WHITE));
        assert_eq!(frame.get(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn test_empty_replay_dir_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        assert!(ReplayCapture::open(dir.path(), &settings).is_err());
    }
}

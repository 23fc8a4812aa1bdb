//! Mock collaborators for testing
//!
//! Scripted screen, recognizer and process implementations that let the
//! engine loops run without a display or a game.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::config::Region;
use crate::error::{Error, Result};
use crate::source::{ProcessMonitor, ScreenCapture, TextRecognizer};
use crate::vision::{Frame, OcrProfile, Rgb};

/// Screen that returns configured frames per region
///
/// Regions without a frame return a black frame of the region's size.
#[derive(Debug)]
pub struct MockScreen {
    size: (u32, u32),
    frames: Mutex<HashMap<Region, VecDeque<Frame>>>,
    captures: AtomicUsize,
    fail: AtomicBool,
}

impl MockScreen {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            frames: Mutex::new(HashMap::new()),
            captures: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Queue a frame for a region; the last queued frame repeats
    pub fn push_frame(&self, region: Region, frame: Frame) {
        self.lock().entry(region).or_default().push_back(frame);
    }

    /// Make every capture fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Region, VecDeque<Frame>>> {
        self.frames
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ScreenCapture for MockScreen {
    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok(self.size)
    }

    fn capture_region(&self, region: &Region) -> Result<Frame> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::CaptureFailed("mock capture failure".to_string()));
        }
        let mut frames = self.lock();
        let frame = match frames.get_mut(region) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(frame.unwrap_or_else(|| Frame::filled(region.width, region.height, Rgb::BLACK)))
    }
}

/// Recognizer returning scripted text per region
///
/// The region is identified by frame size, so every region used in a test
/// must have a distinct size.
#[derive(Debug, Default)]
pub struct MockRecognizer {
    texts: Mutex<HashMap<(u32, u32), String>>,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&self, region: &Region, text: impl Into<String>) {
        self.lock().insert((region.width, region.height), text.into());
    }

    pub fn clear_text(&self, region: &Region) {
        self.lock().remove(&(region.width, region.height));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(u32, u32), String>> {
        self.texts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize_text(&self, frame: &Frame, _profile: OcrProfile) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .lock()
            .get(&(frame.width(), frame.height()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Process monitor with switchable answers
#[derive(Debug)]
pub struct MockProcess {
    running: AtomicBool,
    focused: AtomicBool,
}

impl MockProcess {
    pub fn new(running: bool, focused: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            focused: AtomicBool::new(focused),
        }
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }
}

impl Default for MockProcess {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl ProcessMonitor for MockProcess {
    fn is_process_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn is_process_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

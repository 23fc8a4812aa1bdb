//! Collaborator abstractions for screen access.
//!
//! The loops only talk to these traits, so they can be driven by mock
//! implementations in tests or by recorded frames instead of a live screen.

use crate::config::Region;
use crate::error::Result;
use crate::vision::{Frame, OcrProfile};

/// Captures rectangles of the screen.
pub trait ScreenCapture: Send + Sync {
    /// Full screen size in pixels.
    fn screen_size(&self) -> Result<(u32, u32)>;

    /// Capture the pixels of a screen region.
    fn capture_region(&self, region: &Region) -> Result<Frame>;
}

/// Turns a pre-processed frame into text.
///
/// An empty string means "no text"; errors are treated the same way by the loops.
pub trait TextRecognizer: Send + Sync {
    fn recognize_text(&self, frame: &Frame, profile: OcrProfile) -> Result<String>;
}

/// Reports whether the game process runs and has the foreground window.
pub trait ProcessMonitor: Send + Sync {
    fn is_process_running(&self) -> bool;

    fn is_process_focused(&self) -> bool;
}

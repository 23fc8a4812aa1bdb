//! Live OS collaborators: screen capture and game process monitoring.

mod capture;
mod monitor;

pub use capture::{GdiScreenCapture, frame_from_bgra};
pub use monitor::{SystemProcessMonitor, find_process_ids};

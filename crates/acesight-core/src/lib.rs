pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod process;
pub mod range;
pub mod session;
pub mod shutdown;
pub mod signal;
pub mod source;
pub mod tracking;
pub mod vision;

pub use analysis::{EventResult, EventTag, ModuleResult, StatCounters, StatKind};
pub use config::{MapConfig, MapConfigStore, Region, RegionId, RegionLayout, Settings};
pub use engine::{Engine, EngineHandle};
pub use error::{Error, Result};
pub use export::{PresenceText, SnapshotWriter};
pub use logging::{LogBuffer, LogBufferLayer};
pub use process::{GdiScreenCapture, SystemProcessMonitor};
pub use range::{GridLines, RangeCalculator, RangeMeasurement, compute_range};
pub use session::{Axis, GameState, MapResolver, SessionStore, SharedState, StateSnapshot};
pub use shutdown::ShutdownSignal;
pub use signal::ModuleTag;
pub use source::{ProcessMonitor, ScreenCapture, TextRecognizer};
pub use tracking::{TargetTracker, TrackedTarget, TrackerParams};
pub use vision::{Frame, OcrProfile, Point, Rgb};

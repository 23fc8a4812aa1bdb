mod provider;

// Mock collaborators (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use provider::{ProcessMonitor, ScreenCapture, TextRecognizer};

#[doc(hidden)]
pub use mock::{MockProcess, MockRecognizer, MockScreen};

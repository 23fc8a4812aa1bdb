//! Hit/kill text analysis and combat statistics.

mod event;
mod stats;

pub use event::*;
pub use stats::*;

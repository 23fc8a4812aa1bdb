//! Text signal classification.

mod classifier;
mod tags;

pub use classifier::*;
pub use tags::*;

//! Minimap marker tracking with jump hysteresis.

mod tracker;

pub use tracker::*;

//! Pixel-to-meter range conversion and minimap grid geometry.

mod calculator;
mod grid;

pub use calculator::*;
pub use grid::*;

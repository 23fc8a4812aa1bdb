//! Pixel-level helpers: frames, palettes, OCR filters and circle fitting.

mod circle;
mod frame;
pub mod palette;
pub mod preprocess;

pub use circle::{Circle, min_enclosing_circle};
pub use frame::{BinaryMask, Frame, Point, Rgb};
pub use palette::{Palette, color_mask};
pub use preprocess::OcrProfile;

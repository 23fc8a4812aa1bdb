use super::frame::{BinaryMask, Frame, Rgb};
use crate::error::Result;

/// Yellow player marker on the minimap
pub const PLAYER_MARKER_HEX: &[&str] = &[
    "f2c52f", "caa21f", "f4c832", "f8d970", "c6a228", "8f7520", "f1ca46", "f3d15d", "f4c730",
    "f0c42f", "f2c530", "c39f26", "93781d", "6d5a15", "9b7c18", "f7d35a", "f6d050", "f7d563",
    "e0b628", "f5c830", "f5c937", "b59019",
];

/// Ping (target) marker on the minimap
pub const PING_MARKER_HEX: &[&str] = &[
    "d8d807", "d6d607", "d0d007", "d1d107", "c8c807", "adad06", "b9b906", "bebe06",
];

/// Reference colours of one marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self> {
        let colors = hex
            .iter()
            .map(|h| Rgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { colors })
    }

    pub fn player_marker() -> Self {
        Self::from_hex(PLAYER_MARKER_HEX).unwrap_or_else(|_| Self::new(Vec::new()))
    }

    pub fn ping_marker() -> Self {
        Self::from_hex(PING_MARKER_HEX).unwrap_or_else(|_| Self::new(Vec::new()))
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Whether the colour lies strictly within `tolerance` of any palette entry
    pub fn matches(&self, color: Rgb, tolerance: f64) -> bool {
        self.colors.iter().any(|c| c.distance(&color) < tolerance)
    }
}

/// Switch on every pixel whose colour is within `tolerance` of the palette
pub fn color_mask(frame: &Frame, palette: &Palette, tolerance: f64) -> BinaryMask {
    let bits = frame
        .pixels()
        .map(|p| palette.matches(p, tolerance))
        .collect();
    BinaryMask::from_bits(frame.width(), frame.height(), bits)
}

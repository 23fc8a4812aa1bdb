//! Per-region filters applied before text recognition.
//!
//! Recognition works best on dark text over a light background, so the
//! colour filters render kept pixels black on white.

use image::RgbImage;
use strum::{Display, IntoStaticStr};

use super::frame::{Frame, Rgb};

/// Filter applied to a region before OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum OcrProfile {
    /// Hit/kill notifications: red, yellow-green, amber and lime text
    HitColors,
    /// Damaged modules: strongly red text
    ModuleRed,
    /// Plain grayscale (gear, battle marker, map name, overlays)
    Grayscale,
    /// Minimap scale label: dark pixels only
    ScaleDigits,
}

impl OcrProfile {
    pub fn apply(&self, frame: &Frame) -> Frame {
        match self {
            OcrProfile::HitColors => keep_black_on_white(frame, is_hit_color),
            OcrProfile::ModuleRed => keep_black_on_white(frame, is_module_red),
            OcrProfile::Grayscale => frame.grayscale(),
            OcrProfile::ScaleDigits => keep_black_on_white(frame, is_dark),
        }
    }

    /// Tesseract page segmentation mode: one line for the scale label, a block otherwise
    pub fn page_segmentation(&self) -> u8 {
        match self {
            OcrProfile::ScaleDigits => 7,
            _ => 6,
        }
    }

    /// Character whitelist passed to the recogniser, if any
    pub fn char_whitelist(&self) -> Option<&'static str> {
        match self {
            OcrProfile::ScaleDigits => Some("0123456789."),
            _ => None,
        }
    }
}

fn is_hit_color(p: Rgb) -> bool {
    let red = p.r > 120 && p.g < 70 && p.b < 100;
    let yellow_green = p.r > 190 && p.g > 180 && p.b < 60;
    let amber = p.r > 220 && p.g > 160 && p.b < 50;
    let lime = p.r > 130 && p.r < 160 && p.g > 190 && p.g < 220 && p.b > 0 && p.b < 50;
    red || yellow_green || amber || lime
}

fn is_module_red(p: Rgb) -> bool {
    p.r > 180 && p.g < 80 && p.b < 80
}

fn is_dark(p: Rgb) -> bool {
    p.r <= 50 && p.g <= 50 && p.b <= 50
}

/// Kept pixels become black, everything else white
fn keep_black_on_white(frame: &Frame, keep: impl Fn(Rgb) -> bool) -> Frame {
    let source = frame.as_image();
    let filtered = RgbImage::from_fn(source.width(), source.height(), |x, y| {
        let color = if keep(Rgb::from(*source.get_pixel(x, y))) {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        };
        color.into()
    });
    Frame::from(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(color: Rgb) -> Frame {
        Frame::filled(1, 1, color)
    }

    #[test]
    fn test_hit_colors_kept_black() {
        for color in [
            Rgb::new(200, 30, 40),
            Rgb::new(230, 200, 20),
            Rgb::new(0xe4, 0xac, 0x03),
            Rgb::new(0x90, 0xca, 0x03),
        ] {
            let out = OcrProfile::HitColors.apply(&single(color));
            assert_eq!(out.get(0, 0), Some(Rgb::BLACK), "{color:?}");
        }
        let out = OcrProfile::HitColors.apply(&single(Rgb::new(90, 90, 90)));
        assert_eq!(out.get(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_module_red() {
        let out = OcrProfile::ModuleRed.apply(&single(Rgb::new(200, 20, 20)));
        assert_eq!(out.get(0, 0), Some(Rgb::BLACK));
        // hit-region red is not red enough here
        let out = OcrProfile::ModuleRed.apply(&single(Rgb::new(150, 20, 20)));
        assert_eq!(out.get(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_scale_digits_keeps_dark() {
        let out = OcrProfile::ScaleDigits.apply(&single(Rgb::new(10, 10, 10)));
        assert_eq!(out.get(0, 0), Some(Rgb::BLACK));
        let out = OcrProfile::ScaleDigits.apply(&single(Rgb::new(200, 200, 200)));
        assert_eq!(out.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(OcrProfile::ScaleDigits.char_whitelist(), Some("0123456789."));
    }

    #[test]
    fn test_grayscale_profile() {
        let out = OcrProfile::Grayscale.apply(&single(Rgb::new(255, 255, 255)));
        assert_eq!(out.get(0, 0), Some(Rgb::WHITE));
        let out = OcrProfile::Grayscale.apply(&single(Rgb::new(0, 200, 0)));
        let p = out.get(0, 0).unwrap();
        assert!(p.r == p.g && p.g == p.b);
    }

    #[test]
    fn test_filter_keeps_dimensions() {
        let frame = Frame::filled(7, 3, Rgb::new(200, 20, 20));
        let out = OcrProfile::ModuleRed.apply(&frame);
        assert_eq!((out.width(), out.height()), (7, 3));
        assert!(out.pixels().all(|p| p == Rgb::BLACK));
    }
}

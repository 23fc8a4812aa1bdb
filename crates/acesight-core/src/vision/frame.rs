use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage, imageops};
use serde::Serialize;

use crate::error::{Error, Result};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `"f2c52f"` or `"#f2c52f"`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::ConfigParseError(format!("invalid colour: {hex:?}")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::ConfigParseError(format!("invalid colour: {hex:?}")))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(pixel: image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self::new(r, g, b)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(color: Rgb) -> Self {
        image::Rgb([color.r, color.g, color.b])
    }
}

/// Pixel position inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Captured image of a screen region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap a packed RGB buffer of exactly `width * height * 3` bytes
    pub fn from_raw(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(Error::CaptureFailed(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                rgb.len()
            )));
        }
        RgbImage::from_raw(width, height, rgb)
            .map(Self::from)
            .ok_or_else(|| Error::CaptureFailed(format!("invalid {width}x{height} buffer")))
    }

    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self::from(RgbImage::from_pixel(width, height, color.into()))
    }

    /// Load a PNG or BMP file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from(image::open(path)?.to_rgb8()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.image.pixels().map(|p| Rgb::from(*p))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.image.get_pixel_checked(x, y).map(|p| Rgb::from(*p))
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
            *pixel = color.into();
        }
    }

    /// Sub-rectangle, clamped to the frame bounds
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Frame {
        Self::from(imageops::crop_imm(&self.image, x, y, width, height).to_image())
    }

    /// Luma-only copy, still stored as RGB
    pub fn grayscale(&self) -> Frame {
        let gray = imageops::grayscale(&self.image);
        Self::from(DynamicImage::ImageLuma8(gray).to_rgb8())
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

/// Per-pixel on/off detection mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BinaryMask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Mask with the given pixels switched on (out-of-range points are ignored)
    pub fn from_points(width: u32, height: u32, points: &[Point]) -> Self {
        let mut mask = Self::empty(width, height);
        for p in points {
            if p.x >= 0 && p.y >= 0 {
                mask.set(p.x as u32, p.y as u32, true);
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x < self.width && y < self.height {
            self.bits[y as usize * self.width as usize + x as usize] = on;
        }
    }

    /// Number of "on" pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn points(&self) -> Vec<Point> {
        let width = self.width as usize;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| Point::new((i % width) as i32, (i / width) as i32))
            .collect()
    }

    pub(crate) fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> Self {
        debug_assert_eq!(bits.len(), width as usize * height as usize);
        Self {
            width,
            height,
            bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("f2c52f").unwrap(), Rgb::new(0xf2, 0xc5, 0x2f));
        assert_eq!(Rgb::from_hex("#000000").unwrap(), Rgb::BLACK);
        assert!(Rgb::from_hex("f2c5").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }

    #[test]
    fn test_rgb_distance() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(3, 4, 0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_frame_size_mismatch() {
        assert!(matches!(
            Frame::from_raw(2, 2, vec![0; 9]),
            Err(Error::CaptureFailed(_))
        ));
        assert!(Frame::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_from_raw_is_row_major() {
        let frame = Frame::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(frame.get(1, 0), Some(Rgb::new(4, 5, 6)));
        assert_eq!(frame.get(2, 0), None);
    }

    #[test]
    fn test_crop() {
        let mut frame = Frame::filled(10, 10, Rgb::BLACK);
        frame.set(6, 7, Rgb::WHITE);

        let cropped = frame.crop(5, 5, 3, 3);
        assert_eq!((cropped.width(), cropped.height()), (3, 3));
        assert_eq!(cropped.get(1, 2), Some(Rgb::WHITE));

        let clamped = frame.crop(8, 8, 5, 5);
        assert_eq!((clamped.width(), clamped.height()), (2, 2));
    }

    #[test]
    fn test_grayscale_keeps_white_and_equalises_channels() {
        let mut frame = Frame::filled(2, 1, Rgb::WHITE);
        frame.set(1, 0, Rgb::new(255, 0, 0));

        let gray = frame.grayscale();
        assert_eq!(gray.get(0, 0), Some(Rgb::WHITE));
        let red = gray.get(1, 0).unwrap();
        assert_eq!(red.r, red.g);
        assert_eq!(red.g, red.b);
        assert!(red.r > 0 && red.r < 128);
    }

    #[test]
    fn test_png_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gear.png");
        let mut frame = Frame::filled(3, 2, Rgb::WHITE);
        frame.set(1, 1, Rgb::new(10, 20, 30));

        frame.save(&path).unwrap();
        assert_eq!(Frame::open(&path).unwrap(), frame);
    }

    #[test]
    fn test_to_png_has_signature() {
        let png = Frame::filled(1, 1, Rgb::BLACK).to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_open_missing_file() {
        assert!(Frame::open("/nonexistent/frame.png").is_err());
    }

    #[test]
    fn test_mask_points() {
        let mask = BinaryMask::from_points(4, 4, &[Point::new(1, 2), Point::new(3, 0)]);
        assert_eq!(mask.count(), 2);
        assert!(mask.get(1, 2));
        assert_eq!(mask.points(), vec![Point::new(3, 0), Point::new(1, 2)]);
    }
}

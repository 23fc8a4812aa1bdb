#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

use crate::config::Region;
use crate::error::{Error, Result};
use crate::source::ScreenCapture;
use crate::vision::Frame;

#[cfg(target_os = "windows")]
use windows::Win32::Foundation::HWND;
#[cfg(target_os = "windows")]
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
    DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, GetDIBits, ReleaseDC, SRCCOPY, SelectObject,
};
#[cfg(target_os = "windows")]
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

/// Screen capture through the GDI desktop device context
#[derive(Debug, Default, Clone, Copy)]
pub struct GdiScreenCapture;

impl GdiScreenCapture {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "windows")]
impl ScreenCapture for GdiScreenCapture {
    fn screen_size(&self) -> Result<(u32, u32)> {
        // SAFETY: GetSystemMetrics only reads system configuration values.
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        if width <= 0 || height <= 0 {
            return Err(Error::CaptureFailed(format!(
                "invalid screen size {}x{}",
                width, height
            )));
        }
        Ok((width as u32, height as u32))
    }

    fn capture_region(&self, region: &Region) -> Result<Frame> {
        if region.width == 0 || region.height == 0 {
            return Err(Error::CaptureFailed("region has zero size".to_string()));
        }
        let width = region.width as i32;
        let height = region.height as i32;

        // SAFETY: GetDC with a null window returns the screen device context; it is
        // released with ReleaseDC below. The memory DC and bitmap are created from it,
        // deselected and deleted before returning. The pixel buffer holds exactly
        // width * height 32-bit pixels, matching the top-down BITMAPINFOHEADER passed to
        // GetDIBits.
        unsafe {
            let screen_dc = GetDC(HWND::default());
            if screen_dc.is_invalid() {
                return Err(Error::CaptureFailed("GetDC failed".to_string()));
            }
            let memory_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            let previous = SelectObject(memory_dc, bitmap);

            let blit = BitBlt(
                memory_dc,
                0,
                0,
                width,
                height,
                screen_dc,
                region.left,
                region.top,
                SRCCOPY,
            );

            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };
            let mut buffer = vec![0u8; region.width as usize * region.height as usize * 4];
            let lines = if blit.is_ok() {
                GetDIBits(
                    memory_dc,
                    bitmap,
                    0,
                    region.height,
                    Some(buffer.as_mut_ptr().cast()),
                    &mut info,
                    DIB_RGB_COLORS,
                )
            } else {
                0
            };

            SelectObject(memory_dc, previous);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(memory_dc);
            ReleaseDC(HWND::default(), screen_dc);

            if let Err(e) = blit {
                return Err(Error::CaptureFailed(format!("BitBlt failed: {}", e)));
            }
            if lines != height {
                return Err(Error::CaptureFailed(format!(
                    "GetDIBits copied {} of {} lines",
                    lines, height
                )));
            }

            frame_from_bgra(region.width, region.height, &buffer)
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl ScreenCapture for GdiScreenCapture {
    fn screen_size(&self) -> Result<(u32, u32)> {
        Err(Error::CaptureFailed(
            "Windows only: screen capture not supported on this platform".to_string(),
        ))
    }

    fn capture_region(&self, _region: &Region) -> Result<Frame> {
        Err(Error::CaptureFailed(
            "Windows only: screen capture not supported on this platform".to_string(),
        ))
    }
}

/// Build a frame from 32-bit BGRA rows (alpha ignored)
pub fn frame_from_bgra(width: u32, height: u32, bgra: &[u8]) -> Result<Frame> {
    let rgb = bgra
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();
    Frame::from_raw(width, height, rgb)
}

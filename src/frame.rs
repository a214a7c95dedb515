//! Captured frames and engine inputs.
//!
//! - `RawFrame`: pixels exactly as the capture layer delivered them, tagged with
//!   format, dimensions and row stride. Pixel memory sits behind a lock and is
//!   only reachable through a scoped `PixelLock`.
//! - `EngineInput`: tight-packed RGB24 bytes the inference engine consumes.

use std::fmt;
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, TryLockError};

use crate::error::PipelineError;

/// Bytes per pixel of the only layout the engine accepts.
pub const RGB24_BYTES_PER_PIXEL: usize = 3;

/// Pixel layouts a capture source may hand over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 24-bit packed RGB, the engine's native layout.
    Rgb24,
    Bgr24,
    Bgra32,
    Nv12,
}

impl PixelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Bgr24 => "bgr24",
            PixelFormat::Bgra32 => "bgra32",
            PixelFormat::Nv12 => "nv12",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rgb24" | "rgb" => Some(PixelFormat::Rgb24),
            "bgr24" | "bgr" => Some(PixelFormat::Bgr24),
            "bgra32" | "bgra" => Some(PixelFormat::Bgra32),
            "nv12" => Some(PixelFormat::Nv12),
            _ => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ----------------------------------------------------------------------------
// RawFrame: capture-owned pixel buffer
// ----------------------------------------------------------------------------

/// One captured frame.
///
/// There is no `Clone` and no direct byte accessor; readers go through
/// `lock_pixels`, which hands out a guard that releases on drop.
pub struct RawFrame {
    pixels: Mutex<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Row stride in bytes, padding included.
    pub bytes_per_row: usize,
    /// Monotonic capture counter assigned by the source.
    pub sequence: u64,
}

impl RawFrame {
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        bytes_per_row: usize,
        sequence: u64,
    ) -> Self {
        Self {
            pixels: Mutex::new(pixels),
            width,
            height,
            format,
            bytes_per_row,
            sequence,
        }
    }

    /// Tight-packed RGB24 frame (stride == width * 3).
    pub fn rgb24(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        let stride = width as usize * RGB24_BYTES_PER_PIXEL;
        Self::new(pixels, width, height, PixelFormat::Rgb24, stride, sequence)
    }

    /// Acquire exclusive access to the pixel memory.
    pub fn lock_pixels(&self) -> Result<PixelLock<'_>, PipelineError> {
        let guard = self
            .pixels
            .lock()
            .map_err(|_| PipelineError::LockPoisoned)?;
        Ok(PixelLock { guard })
    }

    /// True while some `PixelLock` on this frame is alive.
    pub fn is_locked(&self) -> bool {
        matches!(self.pixels.try_lock(), Err(TryLockError::WouldBlock))
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes_per_row", &self.bytes_per_row)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Scoped read access to a frame's pixels. Dropping it unlocks the frame.
pub struct PixelLock<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Deref for PixelLock<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.guard.as_slice()
    }
}

// ----------------------------------------------------------------------------
// EngineInput: what the inference engine consumes
// ----------------------------------------------------------------------------

/// Tight-packed RGB24 image. Always `width * height * 3` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInput {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl EngineInput {
    /// Build an input from packed RGB bytes. `None` if the length does not
    /// match the dimensions.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(RGB24_BYTES_PER_PIXEL)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGB triple at (x, y). Caller keeps coordinates in range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * RGB24_BYTES_PER_PIXEL;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_lock_releases_on_drop() {
        let frame = RawFrame::rgb24(vec![0u8; 12], 2, 2, 0);
        {
            let pixels = frame.lock_pixels().unwrap();
            assert_eq!(pixels.len(), 12);
            assert!(frame.is_locked());
        }
        assert!(!frame.is_locked());
    }

    #[test]
    fn engine_input_rejects_length_mismatch() {
        assert!(EngineInput::from_rgb(vec![0u8; 11], 2, 2).is_none());
        let input = EngineInput::from_rgb(vec![7u8; 12], 2, 2).unwrap();
        assert_eq!(input.len(), 12);
        assert_eq!(input.pixel(1, 1), [7, 7, 7]);
    }

    #[test]
    fn pixel_format_parses_aliases() {
        assert_eq!(PixelFormat::parse("RGB"), Some(PixelFormat::Rgb24));
        assert_eq!(PixelFormat::parse("bgra32"), Some(PixelFormat::Bgra32));
        assert_eq!(PixelFormat::parse("yuyv"), None);
    }
}

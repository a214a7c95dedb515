//! Frame adapter: raw capture frames in, engine inputs out.
//!
//! The engine only understands tight-packed RGB24. Anything else is rejected
//! rather than converted; capture sources are configured to deliver RGB24.

use crate::error::{FormatViolation, PipelineError};
use crate::frame::{EngineInput, PixelFormat, RawFrame, RGB24_BYTES_PER_PIXEL};

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameAdapter;

impl FrameAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Validate `frame` and copy its pixels into a fresh `EngineInput`.
    ///
    /// The frame's pixel lock is held only while validating the stride and
    /// copying, and is released on every return path.
    pub fn adapt(&self, frame: &RawFrame) -> Result<EngineInput, PipelineError> {
        if frame.format != PixelFormat::Rgb24 {
            return Err(PipelineError::invalid(
                FormatViolation::UnsupportedPixelFormat(frame.format),
            ));
        }

        let overflow = || {
            PipelineError::invalid(FormatViolation::DimensionsOverflow {
                width: frame.width,
                height: frame.height,
            })
        };
        let row_bytes = (frame.width as usize)
            .checked_mul(RGB24_BYTES_PER_PIXEL)
            .ok_or_else(overflow)?;
        let total = row_bytes
            .checked_mul(frame.height as usize)
            .ok_or_else(overflow)?;

        let pixels = frame.lock_pixels()?;
        // The engine cannot skip row padding.
        if frame.bytes_per_row != row_bytes {
            return Err(PipelineError::invalid(FormatViolation::RowStride {
                bytes_per_row: frame.bytes_per_row,
                expected: row_bytes,
            }));
        }
        if pixels.len() < total {
            return Err(PipelineError::invalid(FormatViolation::ShortBuffer {
                len: pixels.len(),
                expected: total,
            }));
        }
        let data = pixels[..total].to_vec();
        drop(pixels);

        EngineInput::from_rgb(data, frame.width, frame.height).ok_or_else(overflow)
    }
}

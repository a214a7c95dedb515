//! Synthetic camera for `stub://` URIs.
//!
//! Renders a coloured square sliding across a dark gradient. The square
//! changes colour every `COLOR_PERIOD` frames (red, green, blue, white).
//! Pixel format and row padding are configurable so that rejection paths in
//! the adapter can be driven end to end.

use anyhow::Result;

use super::{FrameSource, SourceStats};
use crate::frame::{PixelFormat, RawFrame};

const COLOR_PERIOD: u64 = 30;
const SQUARE_COLORS: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [250, 250, 250]];

#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub uri: String,
    pub width: u32,
    pub height: u32,
    /// Stop after this many frames. `None` runs forever.
    pub frame_limit: Option<u64>,
    pub pixel_format: PixelFormat,
    /// Extra bytes appended to every row.
    pub row_padding: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            uri: "stub://camera".to_string(),
            width: 640,
            height: 480,
            frame_limit: None,
            pixel_format: PixelFormat::Rgb24,
            row_padding: 0,
        }
    }
}

pub struct SyntheticSource {
    config: SyntheticConfig,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }

    /// Top-left corner and side of the square in frame `n`.
    fn square(&self, n: u64) -> (u32, u32, u32) {
        let (w, h) = (self.config.width, self.config.height);
        let side = (w.min(h) / 4).max(1);
        let travel = (w.saturating_sub(side)).max(1) as u64;
        let x = ((n * 8) % travel) as u32;
        let y = (h.saturating_sub(side)) / 2;
        (x, y, side)
    }

    fn rgb_at(&self, x: u32, y: u32, square: (u32, u32, u32), color: [u8; 3]) -> [u8; 3] {
        let (sx, sy, side) = square;
        if x >= sx && x < sx + side && y >= sy && y < sy + side {
            return color;
        }
        let w = self.config.width.max(1);
        let h = self.config.height.max(1);
        [(x * 48 / w) as u8, (y * 48 / h) as u8, 24]
    }

    fn render(&self, n: u64) -> (Vec<u8>, usize) {
        let (w, h) = (self.config.width, self.config.height);
        let padding = self.config.row_padding as usize;
        let square = self.square(n);
        let color = SQUARE_COLORS[((n / COLOR_PERIOD) % SQUARE_COLORS.len() as u64) as usize];

        match self.config.pixel_format {
            PixelFormat::Nv12 => {
                let stride = w as usize + padding;
                let mut data = vec![128u8; stride * h as usize + stride * (h as usize).div_ceil(2)];
                for y in 0..h {
                    for x in 0..w {
                        let [r, g, b] = self.rgb_at(x, y, square, color);
                        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
                        data[y as usize * stride + x as usize] = luma.round() as u8;
                    }
                }
                (data, stride)
            }
            format => {
                let bpp = if format == PixelFormat::Bgra32 { 4 } else { 3 };
                let stride = w as usize * bpp + padding;
                let mut data = vec![0u8; stride * h as usize];
                for y in 0..h {
                    for x in 0..w {
                        let [r, g, b] = self.rgb_at(x, y, square, color);
                        let offset = y as usize * stride + x as usize * bpp;
                        let px = match format {
                            PixelFormat::Rgb24 => [r, g, b, 255],
                            _ => [b, g, r, 255],
                        };
                        data[offset..offset + bpp].copy_from_slice(&px[..bpp]);
                    }
                }
                (data, stride)
            }
        }
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        log::info!(
            "SyntheticSource: connected to {} ({}x{} {})",
            self.config.uri,
            self.config.width,
            self.config.height,
            self.config.pixel_format
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        if self
            .config
            .frame_limit
            .is_some_and(|limit| self.frame_count >= limit)
        {
            return Ok(None);
        }
        let sequence = self.frame_count;
        self.frame_count += 1;

        let (pixels, stride) = self.render(sequence);
        Ok(Some(RawFrame::new(
            pixels,
            self.config.width,
            self.config.height,
            self.config.pixel_format,
            stride,
            sequence,
        )))
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            uri: self.config.uri.clone(),
        }
    }
}

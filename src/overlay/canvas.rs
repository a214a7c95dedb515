use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;

use crate::frame::EngineInput;
use crate::overlay::color::Color;
use crate::overlay::font;
use crate::overlay::surface::{DrawingSurface, Rect, TextExtent};

/// Software RGB24 surface.
///
/// Fills and strokes snap to whole pixels and clip to the canvas. Strokes
/// grow inward from the rectangle edges. A presented frame becomes the
/// backdrop that `clear` restores.
pub struct RgbCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    backdrop: Option<Vec<u8>>,
}

impl RgbCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
            backdrop: None,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        Color::rgb(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        )
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn to_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| anyhow!("canvas buffer does not match {}x{}", self.width, self.height))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing {}", path.display()))
    }

    /// Clip a float rect to integer pixel bounds [x0, x1) x [y0, y1).
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.min_x().round().clamp(0.0, self.width as f32) as u32;
        let x1 = rect.max_x().round().clamp(0.0, self.width as f32) as u32;
        let y0 = rect.min_y().round().clamp(0.0, self.height as f32) as u32;
        let y1 = rect.max_y().round().clamp(0.0, self.height as f32) as u32;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, x1, y0, y1))
    }

    fn put(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[offset..offset + 3].copy_from_slice(&color.to_array());
    }
}

/// Nearest-neighbour resample of a packed RGB image.
fn scale_nearest(src: &EngineInput, width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        let sy = (y as u64 * src.height() as u64 / height as u64) as u32;
        for x in 0..width {
            let sx = (x as u64 * src.width() as u64 / width as u64) as u32;
            out.extend_from_slice(&src.pixel(sx, sy));
        }
    }
    out
}

impl DrawingSurface for RgbCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        match &self.backdrop {
            Some(backdrop) => self.pixels.copy_from_slice(backdrop),
            None => self.pixels.fill(0),
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, x1, y0, y1)) = self.clip(rect) else {
            return;
        };
        let rgb = color.to_array();
        for y in y0..y1 {
            let row = y as usize * self.width as usize * 3;
            for chunk in self.pixels[row + x0 as usize * 3..row + x1 as usize * 3].chunks_exact_mut(3)
            {
                chunk.copy_from_slice(&rgb);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        let t = line_width.round().max(1.0);
        let (x, y) = (rect.min_x(), rect.min_y());
        let (w, h) = (rect.max_x() - x, rect.max_y() - y);
        if t * 2.0 >= w || t * 2.0 >= h {
            self.fill_rect(Rect::new(x, y, w, h), color);
            return;
        }
        self.fill_rect(Rect::new(x, y, w, t), color);
        self.fill_rect(Rect::new(x, y + h - t, w, t), color);
        self.fill_rect(Rect::new(x, y + t, t, h - 2.0 * t), color);
        self.fill_rect(Rect::new(x + w - t, y + t, t, h - 2.0 * t), color);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let scale = font::scale_for(size) as i64;
        let mut pen_x = x.round() as i64;
        let top = y.round() as i64;
        for ch in text.chars() {
            let rows = font::glyph(ch);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH as i64 {
                    if (bits >> (font::GLYPH_WIDTH as i64 - 1 - col)) & 1 == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let px = pen_x + col * scale + dx;
                            let py = top + row as i64 * scale + dy;
                            if px >= 0 && py >= 0 {
                                self.put(px as u32, py as u32, color);
                            }
                        }
                    }
                }
            }
            pen_x += font::GLYPH_ADVANCE as i64 * scale;
        }
    }

    fn text_bounds(&self, text: &str, size: f32) -> TextExtent {
        let (width, height) = font::measure(text, size);
        TextExtent {
            width: width as f32,
            height: height as f32,
        }
    }

    fn present_frame(&mut self, frame: &EngineInput) {
        if frame.is_empty() {
            log::debug!("ignoring empty {}x{} preview", frame.width(), frame.height());
            self.backdrop = None;
            return;
        }
        let backdrop = if frame.width() == self.width && frame.height() == self.height {
            frame.as_bytes().to_vec()
        } else {
            log::debug!(
                "scaling {}x{} preview to {}x{} canvas",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            );
            scale_nearest(frame, self.width, self.height)
        };
        self.backdrop = Some(backdrop);
    }
}

//! Still-image frame source.
//!
//! Decodes a local image once on `connect` and hands it out as RGB24 frames.
//! Local paths only.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use super::{FrameSource, SourceStats};
use crate::frame::RawFrame;

#[derive(Clone, Debug)]
pub struct ImageFileConfig {
    pub path: PathBuf,
    /// How many times to deliver the image. `None` delivers it once.
    pub frame_limit: Option<u64>,
}

struct DecodedImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

pub struct ImageFileSource {
    config: ImageFileConfig,
    image: Option<DecodedImage>,
    frame_count: u64,
}

impl ImageFileSource {
    pub fn new(config: ImageFileConfig) -> Self {
        Self {
            config,
            image: None,
            frame_count: 0,
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width, img.height))
    }
}

impl FrameSource for ImageFileSource {
    fn connect(&mut self) -> Result<()> {
        let decoded = image::open(&self.config.path)
            .with_context(|| format!("decoding {}", self.config.path.display()))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        log::info!(
            "ImageFileSource: loaded {} ({}x{})",
            self.config.path.display(),
            width,
            height
        );
        self.image = Some(DecodedImage {
            pixels: decoded.into_raw(),
            width,
            height,
        });
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| anyhow!("ImageFileSource: next_frame before connect"))?;
        if self.frame_count >= self.config.frame_limit.unwrap_or(1) {
            return Ok(None);
        }
        let frame = RawFrame::rgb24(
            image.pixels.clone(),
            image.width,
            image.height,
            self.frame_count,
        );
        self.frame_count += 1;
        Ok(Some(frame))
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            uri: self.config.path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn delivers_decoded_png_as_rgb24() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("still.png");
        let mut img = RgbImage::new(5, 4);
        img.put_pixel(4, 3, Rgb([1, 2, 3]));
        img.save(&path)?;

        let mut source = ImageFileSource::new(ImageFileConfig {
            path: path.clone(),
            frame_limit: Some(2),
        });
        assert!(source.next_frame().is_err());
        source.connect()?;
        assert_eq!(source.dimensions(), Some((5, 4)));

        let frame = source.next_frame()?.expect("first frame");
        assert_eq!(frame.bytes_per_row, 15);
        let pixels = frame.lock_pixels()?;
        assert_eq!(&pixels[pixels.len() - 3..], &[1, 2, 3]);
        drop(pixels);

        assert!(source.next_frame()?.is_some());
        assert!(source.next_frame()?.is_none());
        Ok(())
    }

    #[test]
    fn missing_file_fails_to_connect() {
        let mut source = ImageFileSource::new(ImageFileConfig {
            path: PathBuf::from("/nonexistent/frame.png"),
            frame_limit: None,
        });
        assert!(source.connect().is_err());
    }
}

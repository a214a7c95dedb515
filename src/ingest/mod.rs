//! Frame capture sources.
//!
//! - `stub://` URIs: synthetic camera (`SyntheticSource`)
//! - local paths: still image decoded with the `image` crate (`ImageFileSource`)
//!
//! Sources deliver `RawFrame`s exactly as captured; they do not convert pixel
//! layouts. Network URL schemes are refused.

pub mod image_file;
pub mod synthetic;

use anyhow::{anyhow, Result};

pub use image_file::{ImageFileConfig, ImageFileSource};
pub use synthetic::{SyntheticConfig, SyntheticSource};

use crate::config::SourceSettings;
use crate::frame::RawFrame;

/// Statistics for a frame source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub uri: String,
}

/// A capture device as seen by the pipeline.
pub trait FrameSource: Send {
    /// Open the underlying device or file.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame. `Ok(None)` ends the stream.
    fn next_frame(&mut self) -> Result<Option<RawFrame>>;

    fn stats(&self) -> SourceStats;
}

/// Open the source named by `settings.uri`.
pub fn open_source(settings: &SourceSettings) -> Result<Box<dyn FrameSource>> {
    let uri = settings.uri.trim();
    if uri.is_empty() {
        return Err(anyhow!("source uri is empty"));
    }
    if settings.is_synthetic() {
        return Ok(Box::new(SyntheticSource::new(SyntheticConfig {
            uri: uri.to_string(),
            width: settings.width,
            height: settings.height,
            frame_limit: settings.frame_limit,
            pixel_format: settings.pixel_format,
            row_padding: settings.row_padding,
        })));
    }
    if uri.contains("://") {
        return Err(anyhow!(
            "source '{}' is not supported (stub:// or a local image path)",
            uri
        ));
    }
    Ok(Box::new(ImageFileSource::new(ImageFileConfig {
        path: uri.into(),
        frame_limit: settings.frame_limit,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_network_sources() {
        let settings = SourceSettings {
            uri: "rtsp://camera-1/stream".to_string(),
            ..SourceSettings::default()
        };
        assert!(open_source(&settings).is_err());
    }

    #[test]
    fn stub_uri_opens_synthetic_source() -> Result<()> {
        let settings = SourceSettings {
            uri: "stub://bench".to_string(),
            width: 32,
            height: 24,
            frame_limit: Some(1),
            ..SourceSettings::default()
        };
        let mut source = open_source(&settings)?;
        source.connect()?;
        let frame = source.next_frame()?.expect("one frame");
        assert_eq!((frame.width, frame.height), (32, 24));
        assert!(source.next_frame()?.is_none());
        assert_eq!(source.stats().uri, "stub://bench");
        Ok(())
    }
}

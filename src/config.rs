use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::engine::builtin::{BrightRegionDetector, BUILTIN_MODELS};
use crate::frame::PixelFormat;
use crate::overlay::CaptionAnchor;

const DEFAULT_SOURCE_URI: &str = "stub://camera";
const DEFAULT_SOURCE_FPS: u32 = 15;
const DEFAULT_SOURCE_WIDTH: u32 = 640;
const DEFAULT_SOURCE_HEIGHT: u32 = 480;

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    source: Option<SourceConfigFile>,
    model: Option<ModelConfigFile>,
    overlay: Option<OverlayStyleFile>,
    pipeline: Option<PipelineConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    uri: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    frames: Option<u64>,
    pixel_format: Option<String>,
    row_padding: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayStyleFile {
    caption_anchor: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PipelineConfigFile {
    drop_late_frames: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub source: SourceSettings,
    pub model: String,
    pub caption_anchor: CaptionAnchor,
    /// Discard frames that arrive while the worker is busy.
    pub drop_late_frames: bool,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub uri: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
    pub frame_limit: Option<u64>,
    pub pixel_format: PixelFormat,
    pub row_padding: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_SOURCE_URI.to_string(),
            target_fps: DEFAULT_SOURCE_FPS,
            width: DEFAULT_SOURCE_WIDTH,
            height: DEFAULT_SOURCE_HEIGHT,
            frame_limit: None,
            pixel_format: PixelFormat::Rgb24,
            row_padding: 0,
        }
    }
}

impl SourceSettings {
    /// `stub://` URIs name the synthetic camera; anything else is a still image.
    pub fn is_synthetic(&self) -> bool {
        self.uri.trim().starts_with("stub://")
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            source: SourceSettings::default(),
            model: BrightRegionDetector::NAME.to_string(),
            caption_anchor: CaptionAnchor::default(),
            drop_late_frames: true,
        }
    }
}

impl OverlayConfig {
    /// Load from the JSON file named by `OVERLAY_CONFIG` (if set), then apply
    /// `OVERLAY_*` environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("OVERLAY_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: OverlayConfigFile) -> Result<Self> {
        let defaults = SourceSettings::default();
        let source_file = file.source.unwrap_or_default();
        let pixel_format = match source_file.pixel_format.as_deref() {
            Some(name) => parse_pixel_format(name)?,
            None => defaults.pixel_format,
        };
        let source = SourceSettings {
            uri: source_file.uri.unwrap_or(defaults.uri),
            target_fps: source_file.target_fps.unwrap_or(defaults.target_fps),
            width: source_file.width.unwrap_or(defaults.width),
            height: source_file.height.unwrap_or(defaults.height),
            frame_limit: source_file.frames,
            pixel_format,
            row_padding: source_file.row_padding.unwrap_or(defaults.row_padding),
        };
        let model = file
            .model
            .and_then(|model| model.name)
            .unwrap_or_else(|| BrightRegionDetector::NAME.to_string());
        let caption_anchor = match file.overlay.and_then(|overlay| overlay.caption_anchor) {
            Some(name) => parse_caption_anchor(&name)?,
            None => CaptionAnchor::default(),
        };
        let drop_late_frames = file
            .pipeline
            .and_then(|pipeline| pipeline.drop_late_frames)
            .unwrap_or(true);
        Ok(Self {
            source,
            model,
            caption_anchor,
            drop_late_frames,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(uri) = std::env::var("OVERLAY_SOURCE") {
            if !uri.trim().is_empty() {
                self.source.uri = uri;
            }
        }
        if let Ok(fps) = std::env::var("OVERLAY_FPS") {
            self.source.target_fps = fps
                .trim()
                .parse()
                .map_err(|_| anyhow!("OVERLAY_FPS must be an integer frame rate"))?;
        }
        if let Ok(frames) = std::env::var("OVERLAY_FRAMES") {
            let frames: u64 = frames
                .trim()
                .parse()
                .map_err(|_| anyhow!("OVERLAY_FRAMES must be an integer frame count"))?;
            self.source.frame_limit = Some(frames);
        }
        if let Ok(model) = std::env::var("OVERLAY_MODEL") {
            if !model.trim().is_empty() {
                self.model = model.trim().to_string();
            }
        }
        if let Ok(anchor) = std::env::var("OVERLAY_CAPTION_ANCHOR") {
            self.caption_anchor = parse_caption_anchor(&anchor)?;
        }
        Ok(())
    }

    /// Re-run after changing fields by hand (e.g. from CLI flags).
    pub fn validate(&self) -> Result<()> {
        if self.source.target_fps == 0 {
            return Err(anyhow!("source target_fps must be greater than zero"));
        }
        if self.source.width == 0 || self.source.height == 0 {
            return Err(anyhow!(
                "source dimensions must be non-zero (got {}x{})",
                self.source.width,
                self.source.height
            ));
        }
        if !BUILTIN_MODELS.contains(&self.model.as_str()) {
            return Err(anyhow!(
                "unknown model '{}' (available: {})",
                self.model,
                BUILTIN_MODELS.join(", ")
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<OverlayConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_pixel_format(value: &str) -> Result<PixelFormat> {
    PixelFormat::parse(value).ok_or_else(|| anyhow!("unknown pixel format '{}'", value))
}

fn parse_caption_anchor(value: &str) -> Result<CaptionAnchor> {
    CaptionAnchor::parse(value).ok_or_else(|| {
        anyhow!(
            "unknown caption anchor '{}' (expected additive or box-top)",
            value
        )
    })
}

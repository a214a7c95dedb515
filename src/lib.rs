//! Frame Overlay
//!
//! Live camera frames in, annotated frames out.
//!
//! # Architecture
//!
//! ```text
//! FrameSource ──RawFrame──▶ FrameAdapter ──EngineInput──▶ InferenceEngine
//!                                                              │
//!                                                      EvaluationResult
//!                                                              ▼
//!       DrawingSurface ◀──draw── OverlayRenderer ◀──Vec<Overlay>
//! ```
//!
//! 1. **Capture**: a source delivers `RawFrame`s in their native layout.
//! 2. **Adapt**: only tightly packed RGB24 frames are accepted; anything else
//!    is rejected per frame with `PipelineError::InvalidInputFormat`.
//! 3. **Evaluate**: the engine is opaque; it sees an `EngineInput` and returns
//!    either bounding boxes or class labels.
//! 4. **Render**: each result entry becomes one overlay. The renderer swaps
//!    its whole collection per successful frame and paints it on request.
//!
//! Capture and inference run on their own threads (`pipeline`); rendering
//! happens on the thread that owns the `Display`.
//!
//! # Module Structure
//!
//! - `frame`: captured frames and engine input
//! - `adapter`: RGB24 validation and packing
//! - `engine`: the inference trait, result types, bundled models
//! - `overlay`: overlay primitives, palette, drawing surfaces
//! - `renderer`: result → overlay mapping and the overlay collection
//! - `ingest`: frame sources (`stub://`, still images)
//! - `pipeline`: threads, hand-off and stats
//! - `config`: JSON + environment configuration

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod ingest;
pub mod overlay;
pub mod pipeline;
pub mod renderer;
pub mod ui;

pub use adapter::FrameAdapter;
pub use config::{OverlayConfig, SourceSettings};
pub use engine::{
    BoundingBox, ClassLabel, EvaluationResult, InferenceEngine, Rectangle, ResultKind,
    SegmentationMask,
};
pub use error::{FormatViolation, PipelineError};
pub use frame::{EngineInput, PixelFormat, RawFrame};
pub use ingest::{open_source, FrameSource, SourceStats};
pub use overlay::{
    BoundingBoxOverlay, CaptionAnchor, Color, Drawable, DrawingSurface, Overlay, OverlayStyle,
    Palette, RecordingSurface, RgbCanvas, TextOverlay,
};
pub use pipeline::{
    Display, FrameProcessor, Pipeline, PipelineHandle, PipelineSettings, PipelineStats,
    StatsSnapshot, UiUpdate,
};
pub use renderer::{overlays_for, OverlayRenderer};

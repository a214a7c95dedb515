//! Overlay primitives and the surfaces they draw on.
//!
//! An overlay is derived from exactly one result entry and lives for one
//! frame. Both kinds share a single capability, `Drawable::draw`.

mod bbox;
pub mod canvas;
mod color;
pub mod font;
pub mod surface;
mod text;

pub use bbox::{BoundingBoxOverlay, CaptionAnchor};
pub use canvas::RgbCanvas;
pub use color::{Color, Palette};
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface, Rect, TextExtent};
pub use text::TextOverlay;

/// Stroke width of bounding boxes; also the unit for label padding.
pub const LINE_WIDTH: f32 = 8.0;
pub const TEXT_SIZE: f32 = LINE_WIDTH * 3.0;
/// Vertical distance between stacked classification labels.
pub const ENTRY_SPACING: f32 = 2.0 * LINE_WIDTH + TEXT_SIZE;

pub trait Drawable {
    fn draw(&self, surface: &mut dyn DrawingSurface);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    Text(TextOverlay),
    BoundingBox(BoundingBoxOverlay),
}

impl Drawable for Overlay {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        match self {
            Overlay::Text(text) => text.draw(surface),
            Overlay::BoundingBox(bbox) => bbox.draw(surface),
        }
    }
}

/// How results are turned into overlays.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayStyle {
    pub palette: Palette,
    pub caption_anchor: CaptionAnchor,
}

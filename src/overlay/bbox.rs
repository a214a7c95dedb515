use crate::engine::{BoundingBox, Rectangle};
use crate::overlay::color::{Color, Palette};
use crate::overlay::surface::{DrawingSurface, Rect};
use crate::overlay::text::TextOverlay;
use crate::overlay::{Drawable, LINE_WIDTH};

/// Where a bounding box's caption is pinned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptionAnchor {
    /// (min_x, min_y + max_y) of the stroked rect.
    #[default]
    Additive,
    /// (min_x, min_y): caption sits on the box's top edge.
    BoxTop,
}

impl CaptionAnchor {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "additive" => Some(CaptionAnchor::Additive),
            "box-top" | "box_top" | "top" => Some(CaptionAnchor::BoxTop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionAnchor::Additive => "additive",
            CaptionAnchor::BoxTop => "box-top",
        }
    }
}

/// A stroked, captioned rectangle in normalized frame coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBoxOverlay {
    pub bounds: Rectangle,
    pub text: String,
    pub color: Color,
    pub caption_anchor: CaptionAnchor,
}

impl BoundingBoxOverlay {
    pub fn new(bounding_box: &BoundingBox, palette: &Palette, caption_anchor: CaptionAnchor) -> Self {
        Self {
            bounds: bounding_box.rectangle,
            text: bounding_box.class_label.label.clone(),
            color: palette.color_for(bounding_box.class_label.class_id),
            caption_anchor,
        }
    }

    /// Stroke rectangle in surface pixels, shrunk by the line width so the
    /// stroke stays inside the nominal box.
    pub fn pixel_rect(&self, surface_width: u32, surface_height: u32) -> Rect {
        let (w, h) = (surface_width as f32, surface_height as f32);
        Rect::new(
            self.bounds.x * w,
            self.bounds.y * h,
            self.bounds.width * w - LINE_WIDTH,
            self.bounds.height * h - LINE_WIDTH,
        )
    }

    pub fn caption(&self, rect: Rect) -> TextOverlay {
        let (x, y) = match self.caption_anchor {
            CaptionAnchor::Additive => (rect.min_x(), rect.min_y() + rect.max_y()),
            CaptionAnchor::BoxTop => (rect.min_x(), rect.min_y()),
        };
        TextOverlay::anchored(self.text.clone(), x, y, self.color)
    }
}

impl Drawable for BoundingBoxOverlay {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let rect = self.pixel_rect(surface.width(), surface.height());
        surface.stroke_rect(rect, self.color, LINE_WIDTH);
        self.caption(rect).draw(surface);
    }
}

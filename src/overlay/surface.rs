//! Drawing surface abstraction and a recording implementation.

use crate::frame::EngineInput;
use crate::overlay::color::Color;

/// Axis-aligned rectangle in surface pixels. y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.x.min(self.x + self.width)
    }

    pub fn min_y(&self) -> f32 {
        self.y.min(self.y + self.height)
    }

    pub fn max_x(&self) -> f32 {
        self.x.max(self.x + self.width)
    }

    pub fn max_y(&self) -> f32 {
        self.y.max(self.y + self.height)
    }

    pub fn offset_by(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    /// Negative values grow the rectangle.
    pub fn inset_by(self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }
}

/// Size of a laid-out string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Imperative 2D drawing target.
pub trait DrawingSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Erase everything drawn since the last clear.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke the outline of `rect` with a band `line_width` pixels thick.
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);

    /// Tight bounds of `text` at `size`.
    fn text_bounds(&self, text: &str, size: f32) -> TextExtent;

    /// Show a preview frame underneath the overlays. Surfaces without a
    /// preview layer ignore it.
    fn present_frame(&mut self, _frame: &EngineInput) {}
}

/// One recorded call on a `RecordingSurface`.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill {
        rect: Rect,
        color: Color,
    },
    Stroke {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    },
    Frame {
        width: u32,
        height: u32,
    },
}

/// Headless surface that records every call. Text is measured as a
/// monospace run of `0.75 * size` per character.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn strokes(&self) -> Vec<(Rect, Color, f32)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Stroke {
                    rect,
                    color,
                    line_width,
                } => Some((*rect, *color, *line_width)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::Stroke {
            rect,
            color,
            line_width,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }

    fn text_bounds(&self, text: &str, size: f32) -> TextExtent {
        TextExtent {
            width: text.chars().count() as f32 * size * 0.75,
            height: size,
        }
    }

    fn present_frame(&mut self, frame: &EngineInput) {
        self.commands.push(DrawCommand::Frame {
            width: frame.width(),
            height: frame.height(),
        });
    }
}

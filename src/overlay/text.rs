use crate::engine::ClassLabel;
use crate::overlay::color::{Color, Palette};
use crate::overlay::surface::{DrawingSurface, Rect};
use crate::overlay::{Drawable, ENTRY_SPACING, LINE_WIDTH, TEXT_SIZE};

/// A text label on a filled background.
///
/// (`x`, `y`) is the label's anchor: the background's top edge sits at
/// `y - text_height + LINE_WIDTH` and its left edge half a line width left of
/// `x`. The text itself sits a quarter of its height below the background's
/// top edge.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub background: Color,
    pub text_color: Color,
    pub x: f32,
    pub y: f32,
}

impl TextOverlay {
    /// Whole-frame classification label, stacked by its rank.
    pub fn stacked(label: &ClassLabel, index: usize, palette: &Palette) -> Self {
        Self {
            text: label.label.clone(),
            background: palette.color_for(label.class_id),
            text_color: Color::BLACK,
            x: 0.0,
            y: ENTRY_SPACING * (index + 1) as f32,
        }
    }

    /// Label pinned to an explicit position.
    pub fn anchored(text: impl Into<String>, x: f32, y: f32, background: Color) -> Self {
        Self {
            text: text.into(),
            background,
            text_color: Color::BLACK,
            x,
            y,
        }
    }

    pub fn background_rect(&self, surface: &dyn DrawingSurface) -> Rect {
        let tight = surface.text_bounds(&self.text, TEXT_SIZE);
        Rect::new(0.0, 0.0, tight.width, tight.height)
            .offset_by(self.x, self.y - tight.height + LINE_WIDTH)
            .inset_by(-LINE_WIDTH / 2.0, 0.0)
    }
}

impl Drawable for TextOverlay {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let background = self.background_rect(&*surface);
        surface.fill_rect(background, self.background);
        let text_rect = background
            .offset_by(0.0, background.height / 4.0)
            .inset_by(LINE_WIDTH / 2.0, 0.0);
        surface.draw_text(
            &self.text,
            text_rect.x,
            text_rect.y,
            TEXT_SIZE,
            self.text_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn stacked_labels_step_down_by_spacing() {
        let palette = Palette::new();
        let label = ClassLabel::new(4, "cat");
        let first = TextOverlay::stacked(&label, 0, &palette);
        let third = TextOverlay::stacked(&label, 2, &palette);
        assert_eq!(first.y, ENTRY_SPACING);
        assert_eq!(third.y, 3.0 * ENTRY_SPACING);
        assert_eq!(first.x, 0.0);
        assert_eq!(first.background, palette.color_for(4));
        assert_eq!(first.text_color, Color::BLACK);
    }

    #[test]
    fn background_is_outset_and_text_sits_a_quarter_down() {
        let mut surface = RecordingSurface::new(200, 200);
        let overlay = TextOverlay::anchored("ab", 50.0, 100.0, Color::WHITE);
        overlay.draw(&mut surface);

        // RecordingSurface measures 0.75 * size per char: 2 * 18 = 36 wide, 24 tall.
        // Text drops 24 / 4 = 6 below the background top.
        let expected_bg = Rect::new(46.0, 84.0, 44.0, 24.0);
        assert_eq!(
            surface.commands()[0],
            DrawCommand::Fill {
                rect: expected_bg,
                color: Color::WHITE
            }
        );
        assert_eq!(
            surface.commands()[1],
            DrawCommand::Text {
                text: "ab".to_string(),
                x: 50.0,
                y: 90.0,
                size: TEXT_SIZE,
                color: Color::BLACK
            }
        );
    }
}

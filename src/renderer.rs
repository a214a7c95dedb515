//! Overlay renderer: owns the current frame's overlay set.

use crate::engine::EvaluationResult;
use crate::error::PipelineError;
use crate::overlay::{
    BoundingBoxOverlay, Drawable, DrawingSurface, Overlay, OverlayStyle, TextOverlay,
};

/// Build one overlay per result entry, in result order.
pub fn overlays_for(
    result: &EvaluationResult,
    style: &OverlayStyle,
) -> Result<Vec<Overlay>, PipelineError> {
    match result {
        EvaluationResult::BoundingBoxes(boxes) => Ok(boxes
            .iter()
            .map(|bbox| {
                Overlay::BoundingBox(BoundingBoxOverlay::new(
                    bbox,
                    &style.palette,
                    style.caption_anchor,
                ))
            })
            .collect()),
        EvaluationResult::ClassLabels(labels) => Ok(labels
            .iter()
            .enumerate()
            .map(|(index, label)| Overlay::Text(TextOverlay::stacked(label, index, &style.palette)))
            .collect()),
        EvaluationResult::SegmentationMasks(_) => Err(PipelineError::UnknownResultType {
            kind: result.kind(),
        }),
    }
}

/// Holds the overlays for the most recent successful frame.
///
/// The set is only ever replaced wholesale. Nothing here survives into the
/// next result set.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    overlays: Vec<Overlay>,
    generation: u64,
    needs_display: bool,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear, repopulate, and request a redraw.
    pub fn replace(&mut self, overlays: Vec<Overlay>) {
        self.overlays.clear();
        self.overlays.extend(overlays);
        self.generation += 1;
        self.needs_display = true;
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Number of `replace` calls so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    /// Paint every overlay once onto `surface`. Returns the overlay count.
    pub fn redraw(&mut self, surface: &mut dyn DrawingSurface) -> usize {
        surface.clear();
        for overlay in &self.overlays {
            overlay.draw(surface);
        }
        self.needs_display = false;
        self.overlays.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BoundingBox, ClassLabel, Rectangle, SegmentationMask};
    use crate::overlay::{RecordingSurface, ENTRY_SPACING};

    fn labels(names: &[&str]) -> EvaluationResult {
        EvaluationResult::ClassLabels(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| ClassLabel::new(i as i32 * 5, *n))
                .collect(),
        )
    }

    #[test]
    fn three_labels_make_three_stacked_texts() {
        let overlays = overlays_for(&labels(&["cat", "dog", "bird"]), &OverlayStyle::default())
            .unwrap();
        assert_eq!(overlays.len(), 3);
        for (i, (overlay, name)) in overlays.iter().zip(["cat", "dog", "bird"]).enumerate() {
            let Overlay::Text(text) = overlay else {
                panic!("expected text overlay");
            };
            assert_eq!(text.text, name);
            assert_eq!(text.y, ENTRY_SPACING * (i + 1) as f32);
        }
    }

    #[test]
    fn boxes_map_one_to_one() {
        let result = EvaluationResult::BoundingBoxes(vec![
            BoundingBox {
                rectangle: Rectangle {
                    x: 0.1,
                    y: 0.1,
                    width: 0.2,
                    height: 0.2,
                },
                class_label: ClassLabel::new(1, "person"),
            };
            4
        ]);
        let overlays = overlays_for(&result, &OverlayStyle::default()).unwrap();
        assert_eq!(overlays.len(), result.len());
        assert!(overlays
            .iter()
            .all(|o| matches!(o, Overlay::BoundingBox(b) if b.text == "person")));
    }

    #[test]
    fn masks_are_an_unknown_result_type() {
        let result = EvaluationResult::SegmentationMasks(vec![SegmentationMask {
            class_label: ClassLabel::new(0, "person"),
            width: 1,
            height: 1,
            mask: vec![1],
        }]);
        assert!(matches!(
            overlays_for(&result, &OverlayStyle::default()),
            Err(PipelineError::UnknownResultType { .. })
        ));
    }

    #[test]
    fn replace_swaps_whole_set_and_redraw_paints_it() {
        let style = OverlayStyle::default();
        let mut renderer = OverlayRenderer::new();
        renderer.replace(overlays_for(&labels(&["a", "b", "c"]), &style).unwrap());
        renderer.replace(overlays_for(&labels(&["z"]), &style).unwrap());
        assert_eq!(renderer.overlays().len(), 1);
        assert_eq!(renderer.generation(), 2);
        assert!(renderer.needs_display());

        let mut surface = RecordingSurface::new(320, 240);
        assert_eq!(renderer.redraw(&mut surface), 1);
        assert!(!renderer.needs_display());
        assert_eq!(surface.texts(), vec!["z"]);
    }
}

use anyhow::{anyhow, Result};

use super::COLOR_LABELS;
use crate::engine::{
    BoundingBox, ClassLabel, EvaluationResult, InferenceEngine, Rectangle, ResultKind,
};
use crate::frame::EngineInput;

const DEFAULT_GRID: u32 = 8;
const DEFAULT_THRESHOLD: f32 = 160.0;
const WHITE_CLASS: usize = 3;

/// Coarse object detector.
///
/// The frame is split into a `grid x grid` mesh. A cell is "lit" when its
/// brightest mean channel reaches `threshold`. Lit cells are grouped by their
/// dominant colour and each group is reported as one box covering its cells.
pub struct BrightRegionDetector {
    grid: u32,
    threshold: f32,
}

impl BrightRegionDetector {
    pub const NAME: &'static str = "bright-region-detector";

    pub fn new() -> Self {
        Self {
            grid: DEFAULT_GRID,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_grid(mut self, grid: u32) -> Self {
        self.grid = grid.max(1);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for BrightRegionDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive cell-index bounds of one colour group.
#[derive(Clone, Copy)]
struct CellSpan {
    col_min: u32,
    col_max: u32,
    row_min: u32,
    row_max: u32,
}

impl CellSpan {
    fn new(col: u32, row: u32) -> Self {
        Self {
            col_min: col,
            col_max: col,
            row_min: row,
            row_max: row,
        }
    }

    fn include(&mut self, col: u32, row: u32) {
        self.col_min = self.col_min.min(col);
        self.col_max = self.col_max.max(col);
        self.row_min = self.row_min.min(row);
        self.row_max = self.row_max.max(row);
    }
}

fn cell_edge(index: u32, cells: u32, extent: u32) -> u32 {
    (index as u64 * extent as u64 / cells as u64) as u32
}

fn dominant_class(mean: [f32; 3]) -> usize {
    let max = mean.iter().copied().fold(f32::MIN, f32::max);
    let min = mean.iter().copied().fold(f32::MAX, f32::min);
    if min >= max * 0.8 {
        return WHITE_CLASS;
    }
    let mut best = 0;
    for channel in 1..3 {
        if mean[channel] > mean[best] {
            best = channel;
        }
    }
    best
}

impl InferenceEngine for BrightRegionDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn result_kind(&self) -> ResultKind {
        ResultKind::BoundingBoxes
    }

    fn evaluate(&mut self, input: &EngineInput) -> Result<EvaluationResult> {
        let (width, height) = (input.width(), input.height());
        if width == 0 || height == 0 {
            return Err(anyhow!("bright-region-detector: empty input"));
        }
        let cols = self.grid.min(width);
        let rows = self.grid.min(height);

        let mut groups: [Option<CellSpan>; 4] = [None; 4];
        for row in 0..rows {
            let (y0, y1) = (cell_edge(row, rows, height), cell_edge(row + 1, rows, height));
            for col in 0..cols {
                let (x0, x1) = (cell_edge(col, cols, width), cell_edge(col + 1, cols, width));
                let mut sums = [0u64; 3];
                for y in y0..y1 {
                    for x in x0..x1 {
                        let px = input.pixel(x, y);
                        sums[0] += px[0] as u64;
                        sums[1] += px[1] as u64;
                        sums[2] += px[2] as u64;
                    }
                }
                let count = ((x1 - x0) as u64 * (y1 - y0) as u64).max(1) as f32;
                let mean = sums.map(|s| s as f32 / count);
                if mean.iter().copied().fold(0.0, f32::max) < self.threshold {
                    continue;
                }
                let class = dominant_class(mean);
                if let Some(span) = &mut groups[class] {
                    span.include(col, row);
                } else {
                    groups[class] = Some(CellSpan::new(col, row));
                }
            }
        }

        let boxes = groups
            .iter()
            .enumerate()
            .filter_map(|(class, span)| span.map(|span| (class, span)))
            .map(|(class, span)| {
                let x0 = cell_edge(span.col_min, cols, width) as f32;
                let x1 = cell_edge(span.col_max + 1, cols, width) as f32;
                let y0 = cell_edge(span.row_min, rows, height) as f32;
                let y1 = cell_edge(span.row_max + 1, rows, height) as f32;
                BoundingBox {
                    rectangle: Rectangle {
                        x: x0 / width as f32,
                        y: y0 / height as f32,
                        width: (x1 - x0) / width as f32,
                        height: (y1 - y0) / height as f32,
                    },
                    class_label: ClassLabel::new(class as i32, COLOR_LABELS[class]),
                }
            })
            .collect();

        Ok(EvaluationResult::BoundingBoxes(boxes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 80x80 dark frame with a filled square of `rgb` over [x0, x1) x [y0, y1).
    fn frame_with_square(rgb: [u8; 3], x0: u32, x1: u32, y0: u32, y1: u32) -> EngineInput {
        let (w, h) = (80u32, 80u32);
        let mut data = vec![16u8; (w * h * 3) as usize];
        for y in y0..y1 {
            for x in x0..x1 {
                let offset = ((y * w + x) * 3) as usize;
                data[offset..offset + 3].copy_from_slice(&rgb);
            }
        }
        EngineInput::from_rgb(data, w, h).unwrap()
    }

    #[test]
    fn dark_frame_has_no_boxes() {
        let mut model = BrightRegionDetector::new();
        let result = model.evaluate(&frame_with_square([0, 0, 0], 0, 0, 0, 0)).unwrap();
        assert_eq!(result, EvaluationResult::BoundingBoxes(vec![]));
    }

    #[test]
    fn finds_square_aligned_to_cells() {
        let mut model = BrightRegionDetector::new();
        // 8x8 grid on 80px => 10px cells; square covers cells 2..=3 x 4..=6.
        let input = frame_with_square([255, 0, 0], 20, 40, 40, 70);
        let EvaluationResult::BoundingBoxes(boxes) = model.evaluate(&input).unwrap() else {
            panic!("expected boxes");
        };
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert_eq!(b.class_label, ClassLabel::new(0, "red"));
        assert!((b.rectangle.x - 0.25).abs() < 1e-6);
        assert!((b.rectangle.y - 0.5).abs() < 1e-6);
        assert!((b.rectangle.width - 0.25).abs() < 1e-6);
        assert!((b.rectangle.height - 0.375).abs() < 1e-6);
    }

    #[test]
    fn threshold_controls_which_cells_light() {
        // Dim green square: mean max channel 120 sits under the default 160.
        let input = frame_with_square([0, 120, 0], 0, 40, 0, 40);
        let mut default = BrightRegionDetector::new();
        assert!(default.evaluate(&input).unwrap().is_empty());

        let mut sensitive = BrightRegionDetector::new().with_threshold(100.0);
        let EvaluationResult::BoundingBoxes(boxes) = sensitive.evaluate(&input).unwrap() else {
            panic!("expected boxes");
        };
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].class_label, ClassLabel::new(1, "green"));
        assert!((boxes[0].rectangle.width - 0.5).abs() < 1e-6);
    }

    #[test]
    fn groups_by_dominant_colour() {
        let mut model = BrightRegionDetector::new().with_grid(4);
        let input = frame_with_square([240, 240, 240], 0, 20, 0, 20);
        let EvaluationResult::BoundingBoxes(boxes) = model.evaluate(&input).unwrap() else {
            panic!("expected boxes");
        };
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].class_label.label, "white");
    }
}

use anyhow::{anyhow, Result};

use super::COLOR_LABELS;
use crate::engine::{ClassLabel, EvaluationResult, InferenceEngine, ResultKind};
use crate::frame::EngineInput;

/// Whole-frame classifier: ranks red, green and blue by mean channel
/// intensity.
#[derive(Default)]
pub struct ColorClassifier;

impl ColorClassifier {
    pub const NAME: &'static str = "color-classifier";

    pub fn new() -> Self {
        Self
    }
}

impl InferenceEngine for ColorClassifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn result_kind(&self) -> ResultKind {
        ResultKind::ClassLabels
    }

    fn evaluate(&mut self, input: &EngineInput) -> Result<EvaluationResult> {
        if input.is_empty() {
            return Err(anyhow!("color-classifier: empty input"));
        }

        let mut sums = [0u64; 3];
        for px in input.as_bytes().chunks_exact(3) {
            sums[0] += px[0] as u64;
            sums[1] += px[1] as u64;
            sums[2] += px[2] as u64;
        }

        let mut ranked: Vec<usize> = (0..3).collect();
        // Stable sort keeps class-id order on ties.
        ranked.sort_by(|a, b| sums[*b].cmp(&sums[*a]));

        Ok(EvaluationResult::ClassLabels(
            ranked
                .into_iter()
                .map(|id| ClassLabel::new(id as i32, COLOR_LABELS[id]))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgb: [u8; 3], width: u32, height: u32) -> EngineInput {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        EngineInput::from_rgb(data, width, height).unwrap()
    }

    #[test]
    fn ranks_channels_by_intensity() {
        let mut model = ColorClassifier::new();
        let result = model.evaluate(&solid([10, 200, 90], 4, 4)).unwrap();
        let EvaluationResult::ClassLabels(labels) = result else {
            panic!("expected class labels");
        };
        let names: Vec<&str> = labels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(names, vec!["green", "blue", "red"]);
        assert_eq!(labels[0].class_id, 1);
    }

    #[test]
    fn ties_keep_class_order() {
        let mut model = ColorClassifier::new();
        let result = model.evaluate(&solid([50, 50, 50], 2, 2)).unwrap();
        let EvaluationResult::ClassLabels(labels) = result else {
            panic!("expected class labels");
        };
        let ids: Vec<i32> = labels.iter().map(|l| l.class_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn empty_input_is_an_engine_error() {
        let mut model = ColorClassifier::new();
        let empty = EngineInput::from_rgb(Vec::new(), 0, 0).unwrap();
        assert!(model.evaluate(&empty).is_err());
    }
}

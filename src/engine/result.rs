use std::fmt;

/// Output of one evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationResult {
    BoundingBoxes(Vec<BoundingBox>),
    /// Ordered by confidence, most likely first.
    ClassLabels(Vec<ClassLabel>),
    /// Per-class masks. The overlay layer has no drawing for these.
    SegmentationMasks(Vec<SegmentationMask>),
}

impl EvaluationResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            EvaluationResult::BoundingBoxes(_) => ResultKind::BoundingBoxes,
            EvaluationResult::ClassLabels(_) => ResultKind::ClassLabels,
            EvaluationResult::SegmentationMasks(_) => ResultKind::SegmentationMasks,
        }
    }

    /// Number of entries in the result set.
    pub fn len(&self) -> usize {
        match self {
            EvaluationResult::BoundingBoxes(boxes) => boxes.len(),
            EvaluationResult::ClassLabels(labels) => labels.len(),
            EvaluationResult::SegmentationMasks(masks) => masks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    BoundingBoxes,
    ClassLabels,
    SegmentationMasks,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::BoundingBoxes => "bounding-boxes",
            ResultKind::ClassLabels => "class-labels",
            ResultKind::SegmentationMasks => "segmentation-masks",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassLabel {
    pub class_id: i32,
    pub label: String,
}

impl ClassLabel {
    pub fn new(class_id: i32, label: impl Into<String>) -> Self {
        Self {
            class_id,
            label: label.into(),
        }
    }
}

/// Rectangle in normalized frame coordinates (0..1 of width / height).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub rectangle: Rectangle,
    pub class_label: ClassLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentationMask {
    pub class_label: ClassLabel,
    pub width: u32,
    pub height: u32,
    /// One byte per mask pixel, row-major.
    pub mask: Vec<u8>,
}

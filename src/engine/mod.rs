mod backend;
pub mod builtin;
mod result;

pub use backend::InferenceEngine;
pub use result::{
    BoundingBox, ClassLabel, EvaluationResult, Rectangle, ResultKind, SegmentationMask,
};

use anyhow::Result;

use crate::engine::result::{EvaluationResult, ResultKind};
use crate::frame::EngineInput;

/// The inference engine seen from the pipeline: an opaque evaluator.
///
/// The pipeline never looks inside a model. It hands over one `EngineInput`
/// per frame, blocks until `evaluate` returns, and dispatches on the result
/// variant. Engine failures are reported as opaque errors and cost the
/// pipeline one frame.
pub trait InferenceEngine: Send {
    /// Model identifier.
    fn name(&self) -> &str;

    /// Model version string.
    fn version(&self) -> &str {
        "unversioned"
    }

    /// The kind of result this model produces.
    fn result_kind(&self) -> ResultKind;

    /// Evaluate one input. Synchronous; no deadline.
    fn evaluate(&mut self, input: &EngineInput) -> Result<EvaluationResult>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn version(&self) -> &str {
        (**self).version()
    }

    fn result_kind(&self) -> ResultKind {
        (**self).result_kind()
    }

    fn evaluate(&mut self, input: &EngineInput) -> Result<EvaluationResult> {
        (**self).evaluate(input)
    }
}

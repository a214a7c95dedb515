use thiserror::Error;

use crate::engine::ResultKind;
use crate::frame::PixelFormat;

/// Per-frame failures. Every variant is caught at the frame boundary,
/// logged, and the frame is dropped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input format: {0}")]
    InvalidInputFormat(FormatViolation),
    #[error("unknown evaluation result type: {kind}")]
    UnknownResultType { kind: ResultKind },
    #[error("frame pixel lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

/// Why a frame was rejected by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatViolation {
    UnsupportedPixelFormat(PixelFormat),
    RowStride { bytes_per_row: usize, expected: usize },
    ShortBuffer { len: usize, expected: usize },
    DimensionsOverflow { width: u32, height: u32 },
}

impl std::fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatViolation::UnsupportedPixelFormat(format) => {
                write!(f, "pixel format {} is not packed RGB24", format)
            }
            FormatViolation::RowStride {
                bytes_per_row,
                expected,
            } => write!(
                f,
                "row stride {} bytes, engine requires tight rows of {} bytes",
                bytes_per_row, expected
            ),
            FormatViolation::ShortBuffer { len, expected } => {
                write!(f, "pixel buffer holds {} bytes, expected {}", len, expected)
            }
            FormatViolation::DimensionsOverflow { width, height } => {
                write!(f, "frame dimensions {}x{} overflow", width, height)
            }
        }
    }
}

impl PipelineError {
    pub(crate) fn invalid(violation: FormatViolation) -> Self {
        PipelineError::InvalidInputFormat(violation)
    }
}

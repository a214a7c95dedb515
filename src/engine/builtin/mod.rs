//! Models bundled with the demo.
//!
//! These stand in for the vendor's pre-built model: the pipeline treats them
//! exactly like any other opaque `InferenceEngine`.

use anyhow::{anyhow, Result};

use crate::engine::InferenceEngine;

pub mod classifier;
pub mod detector;

pub use classifier::ColorClassifier;
pub use detector::BrightRegionDetector;

/// Names accepted by `load`.
pub const BUILTIN_MODELS: &[&str] = &[ColorClassifier::NAME, BrightRegionDetector::NAME];

/// Load a bundled model by name.
pub fn load(name: &str) -> Result<Box<dyn InferenceEngine>> {
    match name {
        ColorClassifier::NAME => Ok(Box::new(ColorClassifier::new())),
        BrightRegionDetector::NAME => Ok(Box::new(BrightRegionDetector::new())),
        other => Err(anyhow!(
            "unknown model '{}' (available: {})",
            other,
            BUILTIN_MODELS.join(", ")
        )),
    }
}

/// Labels shared by the bundled models. Index == class id.
pub(crate) const COLOR_LABELS: [&str; 4] = ["red", "green", "blue", "white"];

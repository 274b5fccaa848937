//! The single externally callable entry point for classification.

use crate::core::errors::BeltError;
use crate::core::registry::ModelRegistry;
use crate::domain::classification::{assemble, ClassificationResult};
use crate::predictor::scoring;
use crate::processors::preprocess::ImagePreprocessor;
use std::sync::Arc;

/// Orchestrates registry -> preprocessing -> scoring -> assembly.
///
/// The service holds no per-request state of its own; the only shared
/// state is the registry's model handle, so one instance can serve
/// concurrent callers.
#[derive(Debug)]
pub struct InferenceService {
    registry: Arc<ModelRegistry>,
    preprocessor: ImagePreprocessor,
}

impl InferenceService {
    /// Creates a service over the given registry.
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            preprocessor: ImagePreprocessor::new(),
        }
    }

    /// Classifies one uploaded image.
    ///
    /// Component errors propagate unchanged; [`BeltError::stage`] names
    /// the stage that failed. A failure is never downgraded to a default
    /// classification.
    pub fn classify(&self, raw_bytes: &[u8]) -> Result<ClassificationResult, BeltError> {
        let model = self.registry.get()?;
        let tensor = self.preprocessor.prepare(raw_bytes, model.input_shape())?;
        let probability = scoring::score(model.as_ref(), &tensor)?;
        let result = assemble(probability);

        tracing::info!(
            label = %result.label,
            probability = result.probability,
            "classification completed"
        );
        Ok(result)
    }
}

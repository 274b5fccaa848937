//! Scalar probability extraction from the classifier's forward pass.
//!
//! The model is a single-output sigmoid head: one sample in, one scalar
//! out. Anything else coming back from the backend is an inference
//! contract violation and fails loudly here instead of producing a
//! meaningless classification.

use crate::core::errors::BeltError;
use crate::core::traits::ClassifierModel;
use crate::core::{Tensor2D, Tensor4D};

/// Runs the model on a single-sample batch and extracts the sigmoid score.
///
/// Deterministic: identical `input` and model yield an identical score.
/// The model is read-only during scoring.
pub fn score(model: &dyn ClassifierModel, input: &Tensor4D) -> Result<f32, BeltError> {
    let output = model.predict(input)?;
    extract_scalar(model.name(), &output)
}

// Validates the single-scalar batch contract ((1, 1) after the backend's
// 1D/2D coercion) and pulls the probability out of it.
fn extract_scalar(model_name: &str, output: &Tensor2D) -> Result<f32, BeltError> {
    let shape = output.shape();
    if shape != &[1, 1] {
        return Err(BeltError::inference_msg(
            model_name,
            format!("expected a single-scalar output, got shape {:?}", shape),
        ));
    }

    let value = output[[0, 0]];
    if !value.is_finite() {
        return Err(BeltError::inference_msg(
            model_name,
            format!("model produced a non-finite score: {value}"),
        ));
    }
    Ok(value)
}

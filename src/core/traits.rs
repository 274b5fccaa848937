//! The classifier capability trait and its resolved input geometry.
//!
//! Concrete backends (the ONNX model, test doubles) implement
//! [`ClassifierModel`], which is all the rest of the pipeline ever sees.

use crate::core::errors::BeltError;
use crate::core::{Tensor2D, Tensor4D};
use serde::{Deserialize, Serialize};

/// Fully resolved model input geometry in NHWC order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    /// Input height in pixels.
    pub height: u32,
    /// Input width in pixels.
    pub width: u32,
    /// Channel count; always 3 (RGB) for this pipeline.
    pub channels: u32,
}

impl InputShape {
    /// Creates an input shape from (height, width, channels).
    pub const fn new(height: u32, width: u32, channels: u32) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Total element count of one sample (height * width * channels).
    pub fn element_count(&self) -> usize {
        self.height as usize * self.width as usize * self.channels as usize
    }

    /// Validates that the shape describes a usable RGB target.
    ///
    /// Non-positive spatial dimensions or a channel count other than 3
    /// are contract violations and fail with `ShapeMismatch`.
    pub fn validate(&self) -> Result<(), BeltError> {
        if self.height == 0 || self.width == 0 {
            return Err(BeltError::shape_mismatch(format!(
                "target shape {} has non-positive dimensions",
                self
            )));
        }
        if self.channels != 3 {
            return Err(BeltError::shape_mismatch(format!(
                "target shape {} must have 3 RGB channels",
                self
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// Capability interface over a loaded classifier backend.
///
/// Implementations must be safe to call concurrently; backends that are
/// not internally re-entrant serialize their calls (see [`crate::core::OrtModel`]).
pub trait ClassifierModel: Send + Sync + std::fmt::Debug {
    /// Declared input geometry the preprocessor must match.
    fn input_shape(&self) -> InputShape;

    /// Runs the forward pass on a single-sample NHWC batch.
    ///
    /// The output is coerced to (batch, classes); for this pipeline the
    /// classifier is single-output sigmoid, so the expected shape is (1, 1).
    fn predict(&self, input: &Tensor4D) -> Result<Tensor2D, BeltError>;

    /// Display name used in logs and error context.
    fn name(&self) -> &str;
}

//! ONNX Runtime backend for the classifier capability.
//!
//! The backend owns a small pool of sessions (selected round-robin) so
//! concurrent requests do not serialize on a single session mutex. Input
//! geometry is read from the artifact's own metadata at load time; the
//! configured shape is only consulted for axes the artifact leaves
//! dynamic.

use crate::core::config::{ModelConfig, OrtGraphOptimizationLevel};
use crate::core::errors::BeltError;
use crate::core::traits::{ClassifierModel, InputShape};
use crate::core::{Tensor2D, Tensor4D};
use ndarray::ArrayView2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{TensorRef, ValueType};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A loaded ONNX classifier.
pub struct OrtModel {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
    input_shape: InputShape,
    model_name: String,
    model_path: PathBuf,
}

impl std::fmt::Debug for OrtModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtModel")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_shape", &self.input_shape)
            .field("model_name", &self.model_name)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OrtModel {
    /// Loads the model described by `config`.
    ///
    /// Builds the session pool, discovers the input/output tensor names,
    /// and resolves the declared input shape. Any failure here is a
    /// `ModelLoad` error: the process cannot serve requests without a
    /// usable model.
    pub fn load(config: &ModelConfig) -> Result<Self, BeltError> {
        config
            .validate()
            .map_err(|e| BeltError::model_load("invalid model configuration", e))?;

        let pool_size = config.session_pool_size.unwrap_or(1).max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(Mutex::new(build_session(config)?));
        }

        let (input_name, output_name, raw_dims) = {
            let session = sessions[0].lock().map_err(|_| {
                BeltError::model_load_msg("session lock poisoned during introspection")
            })?;

            let input = session
                .inputs
                .first()
                .ok_or_else(|| BeltError::model_load_msg("model declares no inputs"))?;
            let raw_dims = match &input.input_type {
                ValueType::Tensor { shape, .. } => shape.iter().copied().collect::<Vec<i64>>(),
                other => {
                    return Err(BeltError::model_load_msg(format!(
                        "unsupported model input type: {:?}",
                        other
                    )));
                }
            };
            let input_name = input.name.clone();

            let output = session
                .outputs
                .first()
                .ok_or_else(|| BeltError::model_load_msg("model declares no outputs"))?;

            (input_name, output.name.clone(), raw_dims)
        };

        let input_shape = resolve_input_shape(&raw_dims, config.input_shape)?;
        tracing::debug!(
            model = %config.resolved_model_name(),
            declared = ?raw_dims,
            resolved = %input_shape,
            "resolved model input shape"
        );

        Ok(Self {
            sessions,
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            input_shape,
            model_name: config.resolved_model_name(),
            model_path: config.model_path.clone(),
        })
    }

    /// Returns the artifact path this model was loaded from.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }
}

impl ClassifierModel for OrtModel {
    fn input_shape(&self) -> InputShape {
        self.input_shape
    }

    fn predict(&self, input: &Tensor4D) -> Result<Tensor2D, BeltError> {
        let input_dims = input.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            BeltError::inference(
                &self.model_name,
                format!("failed to convert input tensor with shape {:?}", input_dims),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session = self.sessions[idx].lock().map_err(|_| {
            BeltError::inference_msg(
                &self.model_name,
                format!("session lock poisoned ({}/{})", idx, self.sessions.len()),
            )
        })?;

        let outputs = session.run(inputs).map_err(|e| {
            BeltError::inference(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                BeltError::inference(
                    &self.model_name,
                    format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        // Sigmoid heads come back as (N, 1) or squeezed to (N,); both
        // coerce to the (batch, classes) contract.
        let (rows, cols) = match output_shape.len() {
            1 => (output_shape[0] as usize, 1),
            2 => (output_shape[0] as usize, output_shape[1] as usize),
            n => {
                return Err(BeltError::inference_msg(
                    &self.model_name,
                    format!(
                        "expected 1D or 2D output tensor, got {}D with shape {:?}",
                        n, output_shape
                    ),
                ));
            }
        };

        if output_data.len() != rows * cols {
            return Err(BeltError::inference_msg(
                &self.model_name,
                format!(
                    "output data size mismatch: expected {}, got {}",
                    rows * cols,
                    output_data.len()
                ),
            ));
        }

        let view = ArrayView2::from_shape((rows, cols), output_data).map_err(|e| {
            BeltError::inference(&self.model_name, "failed to view output as 2D tensor", e)
        })?;
        Ok(view.to_owned())
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

fn build_session(config: &ModelConfig) -> Result<Session, BeltError> {
    let level = match config.graph_opt_level.unwrap_or_default() {
        OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
        OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
    };

    Session::builder()
        .and_then(|b| b.with_optimization_level(level))
        .and_then(|b| b.commit_from_file(&config.model_path))
        .map_err(|e| {
            BeltError::model_load(
                format!(
                    "failed to create ONNX session for '{}'",
                    config.model_path.display()
                ),
                e,
            )
        })
}

/// Resolves the artifact's declared 4D NHWC input into concrete
/// dimensions, consulting `fallback` for dynamic axes.
fn resolve_input_shape(
    raw_dims: &[i64],
    fallback: Option<(u32, u32, u32)>,
) -> Result<InputShape, BeltError> {
    if raw_dims.len() != 4 {
        return Err(BeltError::model_load_msg(format!(
            "expected a 4D NHWC input, model declares {:?}",
            raw_dims
        )));
    }

    let resolve = |axis: &str, declared: i64, fallback: Option<u32>| -> Result<u32, BeltError> {
        if declared > 0 {
            Ok(declared as u32)
        } else {
            fallback.ok_or_else(|| {
                BeltError::model_load_msg(format!(
                    "model declares a dynamic {} axis and no fallback input shape is configured",
                    axis
                ))
            })
        }
    };

    let height = resolve("height", raw_dims[1], fallback.map(|(h, _, _)| h))?;
    let width = resolve("width", raw_dims[2], fallback.map(|(_, w, _)| w))?;
    let channels = resolve("channel", raw_dims[3], fallback.map(|(_, _, c)| c))?;

    if channels != 3 {
        return Err(BeltError::model_load_msg(format!(
            "model expects {} channels; this pipeline only feeds 3-channel RGB input",
            channels
        )));
    }

    Ok(InputShape::new(height, width, channels))
}

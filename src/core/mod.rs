//! Core building blocks of the classification pipeline.
//!
//! This module contains the fundamental components shared by the rest of
//! the crate:
//! - Error handling with per-stage attribution
//! - Model configuration and validation
//! - The classifier capability trait and its ONNX Runtime backend
//! - The model registry (guarded lazy singleton)

pub mod config;
pub mod errors;
pub mod inference;
pub mod registry;
pub mod traits;

pub use config::{ConfigError, ModelConfig, OrtGraphOptimizationLevel};
pub use errors::{BeltError, Stage};
pub use inference::OrtModel;
pub use registry::ModelRegistry;
pub use traits::{ClassifierModel, InputShape};

/// 4D input tensor in NHWC layout (batch, height, width, channels).
pub type Tensor4D = ndarray::Array4<f32>;

/// 2D output tensor (batch, classes).
pub type Tensor2D = ndarray::Array2<f32>;

/// Initializes the tracing subscriber for logging.
///
/// Sets up the subscriber with an environment filter and a formatting
/// layer. Typically called once at the start of the embedding application.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Error types for the classification pipeline.
//!
//! This module defines the error taxonomy of the crate: model loading
//! errors, image decode errors, shape contract violations, and inference
//! failures. Every error maps to the pipeline stage it occurred in via
//! [`BeltError::stage`], so callers can report structured failures without
//! inspecting variants.

use thiserror::Error;

/// Pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Model loading or configuration resolution.
    ModelLoad,
    /// Image decoding, resizing, and tensor assembly.
    Preprocess,
    /// The model forward pass and output extraction.
    Inference,
    /// Result assembly after scoring.
    Postprocess,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::ModelLoad => write!(f, "model-load"),
            Stage::Preprocess => write!(f, "preprocess"),
            Stage::Inference => write!(f, "inference"),
            Stage::Postprocess => write!(f, "postprocess"),
        }
    }
}

/// Errors produced by the classification pipeline.
///
/// `ModelLoad` is fatal: the process cannot serve any request without a
/// model. The remaining variants are per-request and caller-visible. No
/// error is ever downgraded to a default classification.
#[derive(Error, Debug)]
pub enum BeltError {
    /// The model artifact is missing or corrupt, or its shape metadata
    /// cannot be determined.
    #[error("model load failed: {context}")]
    ModelLoad {
        /// What was being loaded or resolved when the failure occurred.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request bytes are not a recognizable image.
    #[error("image decode failed: {context}")]
    Decode {
        /// Why the bytes were rejected.
        context: String,
        /// The decoder error, when one exists.
        #[source]
        source: Option<image::ImageError>,
    },

    /// A tensor shape contradicts the model's declared input contract.
    #[error("shape mismatch: {context}")]
    ShapeMismatch {
        /// The expected and actual geometry.
        context: String,
    },

    /// The model invocation failed or returned an unusable output.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// Display name of the model that was invoked.
        model_name: String,
        /// What went wrong during the forward pass or extraction.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid configuration.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration problem.
        message: String,
    },
}

impl BeltError {
    /// Creates a `ModelLoad` error wrapping an underlying failure.
    pub fn model_load(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a `ModelLoad` error from a message alone.
    pub fn model_load_msg(context: impl Into<String>) -> Self {
        Self::ModelLoad {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a `Decode` error wrapping the decoder failure.
    pub fn decode(context: impl Into<String>, source: image::ImageError) -> Self {
        Self::Decode {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Creates a `Decode` error from a message alone.
    pub fn decode_msg(context: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a `ShapeMismatch` error.
    pub fn shape_mismatch(context: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
        }
    }

    /// Creates an `Inference` error wrapping an underlying failure.
    pub fn inference(
        model_name: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an `Inference` error from a message alone.
    pub fn inference_msg(model_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: None,
        }
    }

    /// Creates a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the pipeline stage this error is attributed to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::ModelLoad { .. } | Self::Config { .. } => Stage::ModelLoad,
            Self::Decode { .. } | Self::ShapeMismatch { .. } => Stage::Preprocess,
            Self::Inference { .. } => Stage::Inference,
        }
    }
}

impl From<crate::core::config::ConfigError> for BeltError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_their_stage() {
        assert_eq!(BeltError::model_load_msg("missing").stage(), Stage::ModelLoad);
        assert_eq!(BeltError::decode_msg("bad bytes").stage(), Stage::Preprocess);
        assert_eq!(BeltError::shape_mismatch("3 != 4").stage(), Stage::Preprocess);
        assert_eq!(
            BeltError::inference_msg("belt", "bad output").stage(),
            Stage::Inference
        );
        assert_eq!(BeltError::config("bad pool size").stage(), Stage::ModelLoad);
    }

    #[test]
    fn display_includes_context() {
        let err = BeltError::inference_msg("belt_classifier", "output shape [1, 3]");
        let text = err.to_string();
        assert!(text.contains("belt_classifier"));
        assert!(text.contains("output shape [1, 3]"));
    }

    #[test]
    fn stage_display_is_lowercase_tag() {
        assert_eq!(Stage::ModelLoad.to_string(), "model-load");
        assert_eq!(Stage::Preprocess.to_string(), "preprocess");
        assert_eq!(Stage::Inference.to_string(), "inference");
        assert_eq!(Stage::Postprocess.to_string(), "postprocess");
    }
}

//! Configuration for the classifier model backend.
//!
//! The model artifact path is resolved at process start and handed to the
//! registry; everything else has workable defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a model path does not exist.
    #[error("model path does not exist: {path}")]
    ModelPathNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Error indicating that a configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the invalid value.
        message: String,
    },
}

/// Graph optimization levels applied when building ONNX Runtime sessions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    #[default]
    Level3,
}

/// Configuration for the classifier model.
///
/// The declared input shape is read from the artifact's own metadata at
/// load time; `input_shape` here is only the fallback for axes the
/// artifact leaves dynamic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model artifact.
    pub model_path: PathBuf,
    /// Display name used in logs and error context. Defaults to the
    /// artifact's file stem.
    pub model_name: Option<String>,
    /// Fallback (height, width, channels) used when the artifact declares
    /// dynamic spatial or channel dimensions.
    pub input_shape: Option<(u32, u32, u32)>,
    /// Number of pooled sessions for concurrent inference. Defaults to 1.
    pub session_pool_size: Option<usize>,
    /// Graph optimization level for session creation.
    pub graph_opt_level: Option<OrtGraphOptimizationLevel>,
}

impl ModelConfig {
    /// Creates a configuration for the given artifact path with defaults
    /// for everything else.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            model_name: None,
            input_shape: None,
            session_pool_size: None,
            graph_opt_level: None,
        }
    }

    /// Sets the display name of the model.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Sets the fallback input shape as (height, width, channels).
    pub fn input_shape(mut self, height: u32, width: u32, channels: u32) -> Self {
        self.input_shape = Some((height, width, channels));
        self
    }

    /// Sets the session pool size (minimum 1).
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = Some(size);
        self
    }

    /// Sets the graph optimization level.
    pub fn graph_opt_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.graph_opt_level = Some(level);
        self
    }

    /// Returns the configured model name, or one derived from the
    /// artifact path.
    pub fn resolved_model_name(&self) -> String {
        self.model_name.clone().unwrap_or_else(|| {
            self.model_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "belt_classifier".to_string())
        })
    }

    /// Validates the configuration.
    ///
    /// Checks that the artifact path points at a file, the session pool
    /// size is positive, and the fallback shape (when set) describes a
    /// positive-dimension 3-channel image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_model_path(&self.model_path)?;

        if let Some(size) = self.session_pool_size {
            if size == 0 {
                return Err(ConfigError::InvalidConfig {
                    message: "session_pool_size must be greater than 0".to_string(),
                });
            }
        }

        if let Some((height, width, channels)) = self.input_shape {
            if height == 0 || width == 0 {
                return Err(ConfigError::InvalidConfig {
                    message: format!(
                        "fallback input shape must have positive dimensions, got {}x{}",
                        height, width
                    ),
                });
            }
            if channels != 3 {
                return Err(ConfigError::InvalidConfig {
                    message: format!(
                        "fallback input shape must declare 3 RGB channels, got {}",
                        channels
                    ),
                });
            }
        }

        Ok(())
    }
}

fn validate_model_path(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ModelPathNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(ConfigError::InvalidConfig {
            message: format!(
                "model path must be a file, not a directory: {}",
                path.display()
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_artifact(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("belt-vision-{}-{}", std::process::id(), name));
        std::fs::write(&path, b"onnx").expect("write temp artifact");
        path
    }

    #[test]
    fn missing_model_path_is_rejected() {
        let config = ModelConfig::new("/nonexistent/model.onnx");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ModelPathNotFound { .. })
        ));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let path = temp_artifact("pool.onnx");
        let config = ModelConfig::new(&path).session_pool_size(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig { .. })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn non_rgb_fallback_shape_is_rejected() {
        let path = temp_artifact("channels.onnx");
        let config = ModelConfig::new(&path).input_shape(150, 150, 4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig { .. })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn valid_config_passes_and_derives_name() {
        let path = temp_artifact("ok.onnx");
        let config = ModelConfig::new(&path).input_shape(150, 150, 3);
        assert!(config.validate().is_ok());
        assert!(config.resolved_model_name().contains("ok"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn explicit_name_wins_over_file_stem() {
        let config = ModelConfig::new("models/belt.onnx").model_name("belt_v2");
        assert_eq!(config.resolved_model_name(), "belt_v2");
    }
}

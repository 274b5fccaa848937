//! # belt-vision
//!
//! A Rust library that classifies whether a person in an uploaded image is
//! wearing a seat belt, using an ONNX classifier model.
//!
//! The crate covers the inference request pipeline: image decoding and
//! normalization, model-shape negotiation, prediction, thresholding, and
//! result packaging. The HTTP boundary and durable persistence are left to
//! the embedding host; the record-store seam is declared in [`storage`].
//!
//! ## Components
//!
//! * [`core`] - errors, configuration, the model capability trait, the ONNX
//!   backend, and the model registry (guarded lazy singleton)
//! * [`processors`] - image preprocessing into model-ready tensors
//! * [`predictor`] - scalar probability extraction from the forward pass
//! * [`domain`] - labels, the decision threshold, and result assembly
//! * [`pipeline`] - the `classify(bytes)` orchestrator
//! * [`storage`] - the declared record-store interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use belt_vision::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ModelConfig::new("models/belt_classifier.onnx");
//! let registry = Arc::new(ModelRegistry::new(config));
//! let service = InferenceService::new(registry);
//!
//! let bytes = std::fs::read("frame.jpg")?;
//! let result = service.classify(&bytes)?;
//! println!("{}: {:.4}", result.label, result.probability);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod predictor;
pub mod processors;
pub mod storage;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{
        BeltError, ClassifierModel, InputShape, ModelConfig, ModelRegistry, OrtModel, Stage,
    };
    pub use crate::domain::{BeltLabel, ClassificationResult};
    pub use crate::pipeline::InferenceService;
    pub use crate::processors::ImagePreprocessor;
    pub use crate::storage::{InferenceRecord, MemoryRecordStore, RecordStore};
}

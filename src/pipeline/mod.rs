//! Request-level orchestration of the classification pipeline.

pub mod service;

pub use service::InferenceService;

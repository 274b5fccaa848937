//! Inference backends implementing the classifier capability.

pub mod ort_model;

pub use ort_model::OrtModel;

//! Image processing for the classification pipeline.

pub mod normalization;
pub mod preprocess;

pub use normalization::{ChannelOrder, NormalizeImage};
pub use preprocess::ImagePreprocessor;

//! Utility functions shared across the pipeline.

pub mod image;

pub use self::image::{decode_image, dynamic_to_rgb};

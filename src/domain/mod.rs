//! Domain types for seat-belt classification.

pub mod classification;

pub use classification::{assemble, BeltLabel, ClassificationResult, DECISION_THRESHOLD};

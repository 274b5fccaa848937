//! Declared interface to the external record store.
//!
//! The core produces the fields to persist; storage lifecycle belongs to
//! the embedding host. [`MemoryRecordStore`] backs tests and lightweight
//! embeddings.

use crate::domain::classification::{BeltLabel, ClassificationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Persisted projection of a classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRecord {
    /// Generated identity of the stored row.
    pub id: Uuid,
    /// Derived label.
    pub label: BeltLabel,
    /// Raw model score.
    pub probability: f32,
    /// Human-readable message for the label.
    pub message: String,
    /// When the record was created.
    pub recorded_at: DateTime<Utc>,
}

impl InferenceRecord {
    /// Stamps a classification result with identity and time.
    pub fn from_result(result: &ClassificationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: result.label,
            probability: result.probability,
            message: result.message.clone(),
            recorded_at: Utc::now(),
        }
    }
}

/// Store seam the host implements with real persistence.
pub trait RecordStore: Send + Sync {
    /// Persists one result; returns the stored record with its generated
    /// id and timestamp.
    fn save(&self, result: &ClassificationResult) -> InferenceRecord;
}

/// In-memory store used by tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<InferenceRecord>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far, oldest first.
    pub fn records(&self) -> Vec<InferenceRecord> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&self, result: &ClassificationResult) -> InferenceRecord {
        let record = InferenceRecord::from_result(result);
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(record.clone());
        record
    }
}

//! Process-wide model ownership with guarded lazy initialization.
//!
//! The registry is an explicitly constructed, dependency-injected service:
//! it owns the model handle behind a one-shot cell instead of hiding it in
//! global mutable state. Concurrent first calls race on the cell, at most
//! one load runs, and every caller observes the same loaded model
//! afterwards. A failed load is not cached, so a later call may retry.

use crate::core::config::ModelConfig;
use crate::core::errors::BeltError;
use crate::core::inference::OrtModel;
use crate::core::traits::ClassifierModel;
use once_cell::sync::OnceCell;
use std::sync::Arc;

type ModelLoader = dyn Fn() -> Result<Arc<dyn ClassifierModel>, BeltError> + Send + Sync;

/// Owns the single loaded classifier for the life of the process.
pub struct ModelRegistry {
    loader: Box<ModelLoader>,
    model: OnceCell<Arc<dyn ClassifierModel>>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("loaded", &self.model.get().is_some())
            .finish()
    }
}

impl ModelRegistry {
    /// Creates a registry backed by the ONNX artifact described by
    /// `config`. The artifact is not touched until the first
    /// [`get`](Self::get).
    pub fn new(config: ModelConfig) -> Self {
        Self::with_loader(move || {
            let model = OrtModel::load(&config)?;
            Ok(Arc::new(model) as Arc<dyn ClassifierModel>)
        })
    }

    /// Creates a registry over an arbitrary loader.
    ///
    /// This is the seam tests use to count loads or inject model doubles
    /// without a real artifact on disk.
    pub fn with_loader(
        loader: impl Fn() -> Result<Arc<dyn ClassifierModel>, BeltError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            loader: Box::new(loader),
            model: OnceCell::new(),
        }
    }

    /// Returns the shared model, loading it on first call.
    ///
    /// Thread-safe under a concurrent first-call race: the cell guarantees
    /// at most one invocation of the loader, and losers of the race block
    /// until the winner finishes.
    pub fn get(&self) -> Result<Arc<dyn ClassifierModel>, BeltError> {
        self.model
            .get_or_try_init(|| {
                tracing::info!("loading classifier model");
                let model = (self.loader)()?;
                tracing::info!(
                    model = model.name(),
                    input_shape = %model.input_shape(),
                    "classifier model loaded"
                );
                Ok(model)
            })
            .map(Arc::clone)
    }

    /// Eagerly loads the model so a fatal `ModelLoad` error surfaces at
    /// startup instead of on the first request.
    pub fn preload(&self) -> Result<(), BeltError> {
        self.get().map(|_| ())
    }

    /// Whether the model has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }
}

//! Application state shared by all handlers.

use rico_core::{Config, GenerationMode};
use rico_providers::ImageTransformer;
use rico_storage::Storage;
use std::sync::Arc;

/// Read-only dependencies of the generation endpoint.
///
/// The provider is optional: without it the endpoint runs in placeholder mode.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub transformer: Option<Arc<dyn ImageTransformer>>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        transformer: Option<Arc<dyn ImageTransformer>>,
    ) -> Self {
        Self {
            config,
            storage,
            transformer,
        }
    }

    pub fn generation_mode(&self) -> GenerationMode {
        if self.transformer.is_some() {
            GenerationMode::Live
        } else {
            GenerationMode::Placeholder
        }
    }
}

// presets/mod.rs
mod file_store;
mod store;
mod validation;

pub use file_store::JsonFilePresetStore;
pub use store::{MemoryPresetStore, PresetStore, StoreError};
pub use validation::{CreatePresetRequest, MAX_NAME_LENGTH};

use std::sync::Arc;
use tracing::{info, warn};

use crate::{error::AppError, models::Preset};

/// Validates and persists presets on top of a [`PresetStore`].
#[derive(Clone)]
pub struct PresetService {
    store: Arc<dyn PresetStore>,
}

impl PresetService {
    pub fn new(store: Arc<dyn PresetStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPresetStore::new()))
    }

    /// Saves a preset. Nothing is written when validation fails.
    pub async fn save(&self, request: CreatePresetRequest) -> Result<Preset, AppError> {
        let new_preset = request.into_new_preset().map_err(|errors| {
            metrics::counter!("preset_validation_failures_total").increment(1);
            warn!(%errors, "Preset rejected");
            errors
        })?;

        let preset = self.store.create(new_preset).await?;
        metrics::counter!("presets_saved_total").increment(1);
        info!(id = preset.id, name = %preset.name, device = %preset.device, "Preset saved");
        Ok(preset)
    }

    /// All presets, newest first.
    pub async fn list(&self) -> Result<Vec<Preset>, AppError> {
        let mut presets = self.store.list().await?;
        presets.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(presets)
    }

    pub async fn find(&self, id: u64) -> Result<Preset, AppError> {
        self.store
            .list()
            .await?
            .into_iter()
            .find(|preset| preset.id == id)
            .ok_or(AppError::NotFound)
    }
}

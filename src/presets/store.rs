// store.rs
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{NewPreset, Preset};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Create/list record store for presets.
///
/// Implementations assign ids that are unique across concurrent `create`
/// calls, and `list` never observes a preset that is not fully written.
#[async_trait]
pub trait PresetStore: Send + Sync {
    async fn create(&self, preset: NewPreset) -> Result<Preset, StoreError>;
    async fn list(&self) -> Result<Vec<Preset>, StoreError>;
}

/// Builds the record for the next id, stamping both timestamps.
pub(crate) fn materialize(id: u64, preset: NewPreset) -> Preset {
    let now = Utc::now();
    Preset {
        id,
        name: preset.name,
        device: preset.device,
        settings: preset.settings,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Debug, Default)]
struct Records {
    last_id: u64,
    presets: Vec<Preset>,
}

/// Store kept in process memory, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryPresetStore {
    records: RwLock<Records>,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresetStore for MemoryPresetStore {
    async fn create(&self, preset: NewPreset) -> Result<Preset, StoreError> {
        let mut records = self.records.write().await;
        records.last_id += 1;
        let preset = materialize(records.last_id, preset);
        records.presets.push(preset.clone());
        Ok(preset)
    }

    async fn list(&self) -> Result<Vec<Preset>, StoreError> {
        let records = self.records.read().await;
        Ok(records.presets.iter().rev().cloned().collect())
    }
}

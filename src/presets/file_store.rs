// file_store.rs
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

use super::store::{PresetStore, StoreError, materialize};
use crate::models::{NewPreset, Preset};

/// Store persisted as a JSON array in a single file.
///
/// The whole file is rewritten on every create, through a temporary file
/// that is renamed over the old one.
pub struct JsonFilePresetStore {
    path: PathBuf,
    presets: Mutex<Vec<Preset>>,
}

impl JsonFilePresetStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let presets = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<Preset>>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), count = presets.len(), "Preset file loaded");

        Ok(Self {
            path,
            presets: Mutex::new(presets),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, presets: &[Preset]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(presets)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), "Preset file written");
        Ok(())
    }
}

#[async_trait]
impl PresetStore for JsonFilePresetStore {
    async fn create(&self, preset: NewPreset) -> Result<Preset, StoreError> {
        let mut presets = self.presets.lock().await;
        let id = presets.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let preset = materialize(id, preset);
        presets.push(preset.clone());

        if let Err(e) = self.persist(&presets).await {
            presets.pop();
            return Err(e);
        }
        Ok(preset)
    }

    async fn list(&self) -> Result<Vec<Preset>, StoreError> {
        let presets = self.presets.lock().await;
        let mut listed = presets.clone();
        listed.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(listed)
    }
}

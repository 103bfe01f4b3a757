use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, sync::atomic::AtomicUsize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    devices::{Device, DeviceState, SettingKey, clamp_setting},
    presets::PresetService,
};

/// A stored, named snapshot of one device's settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Preset {
    pub id: u64,
    pub name: String,
    pub device: Device,
    #[schema(value_type = Object)]
    pub settings: Map<String, Value>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// A validated preset that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPreset {
    pub name: String,
    pub device: Device,
    pub settings: Map<String, Value>,
}

/// Typed view over the opaque `settings` blob of a preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetSettings {
    pub fan_speed: Option<u8>,
    pub light_intensity: Option<u8>,
    pub light_color: Option<String>,
}

impl PresetSettings {
    /// Reads the known keys, ignoring values of the wrong type.
    pub fn from_map(settings: &Map<String, Value>) -> Self {
        let level = |key: SettingKey| {
            settings
                .get(key.as_str())
                .and_then(Value::as_i64)
                .map(clamp_setting)
        };
        Self {
            fan_speed: level(SettingKey::FanSpeed),
            light_intensity: level(SettingKey::LightIntensity),
            light_color: settings
                .get("lightColor")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(speed) = self.fan_speed {
            map.insert(SettingKey::FanSpeed.as_str().to_string(), speed.into());
        }
        if let Some(intensity) = self.light_intensity {
            map.insert(SettingKey::LightIntensity.as_str().to_string(), intensity.into());
        }
        if let Some(color) = self.light_color {
            map.insert("lightColor".to_string(), color.into());
        }
        map
    }
}

/// Body returned by `POST /presets` on success.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PresetSavedResponse {
    pub message: String,
    pub preset: Preset,
}

/// Body returned when a request fails validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Messages exchanged on the simulator socket.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    SetActiveDevice { device: Device },
    UpdateSetting { key: SettingKey, value: i64 },
    SetLightColor { color: String },
    TogglePower,
    ApplyPreset { preset_id: u64 },
    SavePreset { name: String },
    ListPresets,
    State(DeviceState),
    Presets { presets: Vec<Preset> },
    PresetSaved { preset: Preset },
    ValidationFailed { errors: BTreeMap<String, Vec<String>> },
    Error { message: String, code: u16 },
}

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub connected_at: DateTime<Utc>,
}

pub struct AppState {
    pub presets: PresetService,
    pub sessions: DashMap<Uuid, SessionEntry>,
    pub max_sessions: usize,
    /// Sessions holding a slot under `max_sessions`.
    pub open_sessions: AtomicUsize,
}

impl AppState {
    pub fn new(presets: PresetService, max_sessions: usize) -> Self {
        Self {
            presets,
            sessions: DashMap::new(),
            max_sessions,
            open_sessions: AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preset_settings_reads_known_keys() {
        let map = json!({ "fanSpeed": 40, "lightColor": "#FFFFFF", "extra": true });
        let settings = PresetSettings::from_map(map.as_object().unwrap());
        assert_eq!(settings.fan_speed, Some(40));
        assert_eq!(settings.light_intensity, None);
        assert_eq!(settings.light_color.as_deref(), Some("#FFFFFF"));
    }

    #[test]
    fn preset_settings_ignores_wrong_types() {
        let map = json!({ "fanSpeed": "fast", "lightIntensity": 12.5, "lightColor": 3 });
        let settings = PresetSettings::from_map(map.as_object().unwrap());
        assert_eq!(settings, PresetSettings::default());
    }

    #[test]
    fn preset_settings_clamps_levels() {
        let map = json!({ "fanSpeed": 400, "lightIntensity": -3 });
        let settings = PresetSettings::from_map(map.as_object().unwrap());
        assert_eq!(settings.fan_speed, Some(100));
        assert_eq!(settings.light_intensity, Some(0));
    }

    #[test]
    fn ws_message_tagging() {
        let msg: WsMessage =
            serde_json::from_str(r#"{"type":"update_setting","key":"fanSpeed","value":55}"#)
                .unwrap();
        assert!(matches!(
            msg,
            WsMessage::UpdateSetting { key: SettingKey::FanSpeed, value: 55 }
        ));

        let msg: WsMessage = serde_json::from_str(r#"{"type":"toggle_power"}"#).unwrap();
        assert!(matches!(msg, WsMessage::TogglePower));

        let state = serde_json::to_value(WsMessage::State(DeviceState::new())).unwrap();
        assert_eq!(state["type"], "state");
        assert_eq!(state["activeDevice"], "Fan");
    }
}

// state.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{Device, MAX_SETTING_VALUE, SettingKey, default_light_color};
use crate::models::{Preset, PresetSettings};

/// State of the simulated device driven by one simulator session.
///
/// The values of the inactive device are kept but have no effect until that
/// device is selected again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    pub active_device: Device,
    pub is_on: bool,
    pub fan_speed: u8,
    pub light_intensity: u8,
    pub light_color: String,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            active_device: Device::Fan,
            is_on: false,
            fan_speed: 0,
            light_intensity: 0,
            light_color: default_light_color(),
        }
    }
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setting(&self, key: SettingKey) -> u8 {
        match key {
            SettingKey::FanSpeed => self.fan_speed,
            SettingKey::LightIntensity => self.light_intensity,
        }
    }

    /// Value of the setting that powers the active device.
    pub fn active_level(&self) -> u8 {
        self.setting(self.active_device.controlling_setting())
    }

    pub fn set_active_device(&mut self, device: Device) {
        self.active_device = device;
    }

    /// Stores `value` and derives power from it.
    ///
    /// Any non-zero value powers the device on. A zero only powers it off
    /// when `key` belongs to the active device.
    pub fn update_setting(&mut self, key: SettingKey, value: u8) {
        let value = value.min(MAX_SETTING_VALUE);
        match key {
            SettingKey::FanSpeed => self.fan_speed = value,
            SettingKey::LightIntensity => self.light_intensity = value,
        }

        if value > 0 {
            self.is_on = true;
        } else if self.is_on && key == self.active_device.controlling_setting() {
            self.is_on = false;
        }
    }

    pub fn set_light_color(&mut self, color: impl Into<String>) {
        self.light_color = color.into();
    }

    /// Flips power. Powering off zeroes both devices' levels; powering on
    /// leaves them as they are.
    pub fn toggle_power(&mut self) {
        self.is_on = !self.is_on;
        if !self.is_on {
            self.fan_speed = 0;
            self.light_intensity = 0;
        }
    }

    /// Replaces the whole state with the one described by `preset`.
    ///
    /// Missing settings fall back to 0 and the default light color.
    pub fn apply_preset(&mut self, preset: &Preset) {
        let settings = PresetSettings::from_map(&preset.settings);
        let mut next = DeviceState {
            active_device: preset.device,
            is_on: false,
            fan_speed: settings.fan_speed.unwrap_or(0),
            light_intensity: settings.light_intensity.unwrap_or(0),
            light_color: settings.light_color.unwrap_or_else(default_light_color),
        };
        next.is_on = next.active_level() > 0;
        *self = next;
    }

    /// Preset payload for the active device.
    pub fn snapshot(&self) -> (Device, Map<String, Value>) {
        let settings = match self.active_device {
            Device::Fan => PresetSettings {
                fan_speed: Some(self.fan_speed),
                ..Default::default()
            },
            Device::Light => PresetSettings {
                light_intensity: Some(self.light_intensity),
                light_color: Some(self.light_color.clone()),
                ..Default::default()
            },
        };
        (self.active_device, settings.into_map())
    }
}

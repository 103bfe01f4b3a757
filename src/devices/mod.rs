// devices/mod.rs
mod state;

pub use state::DeviceState;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Simulated device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Device {
    Fan,
    Light,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Fan, Device::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Fan => "Fan",
            Device::Light => "Light",
        }
    }

    /// The setting whose value decides whether this device is powered.
    pub fn controlling_setting(&self) -> SettingKey {
        match self {
            Device::Fan => SettingKey::FanSpeed,
            Device::Light => SettingKey::LightIntensity,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown device `{0}`")]
pub struct UnknownDevice(pub String);

impl FromStr for Device {
    type Err = UnknownDevice;

    // Exact match only, "fan" is not a device.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::ALL
            .into_iter()
            .find(|device| device.as_str() == s)
            .ok_or_else(|| UnknownDevice(s.to_string()))
    }
}

/// Numeric settings that can be adjusted through `update_setting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    FanSpeed,
    LightIntensity,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::FanSpeed => "fanSpeed",
            SettingKey::LightIntensity => "lightIntensity",
        }
    }
}

pub const MAX_SETTING_VALUE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPreset {
    pub hex: &'static str,
    pub name: &'static str,
}

/// Palette offered for the light. The first entry is the default color.
pub const COLOR_PRESETS: [ColorPreset; 4] = [
    ColorPreset { hex: "#FFECD9", name: "Warm White" },
    ColorPreset { hex: "#FFFFFF", name: "Daylight" },
    ColorPreset { hex: "#B0E0FF", name: "Cool Blue" },
    ColorPreset { hex: "#FFB0C0", name: "Rose" },
];

pub fn default_light_color() -> String {
    COLOR_PRESETS[0].hex.to_string()
}

/// Accepts `#RGB` and `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Clamps an untrusted integer into the setting range.
pub fn clamp_setting(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_SETTING_VALUE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_parses_exact_names_only() {
        assert_eq!("Fan".parse::<Device>().unwrap(), Device::Fan);
        assert_eq!("Light".parse::<Device>().unwrap(), Device::Light);
        assert!("fan".parse::<Device>().is_err());
        assert!("Heater".parse::<Device>().is_err());
        assert!("".parse::<Device>().is_err());
    }

    #[test]
    fn controlling_setting_matches_device() {
        assert_eq!(Device::Fan.controlling_setting(), SettingKey::FanSpeed);
        assert_eq!(Device::Light.controlling_setting(), SettingKey::LightIntensity);
    }

    #[test]
    fn hex_color_check() {
        assert!(is_hex_color("#FFECD9"));
        assert!(is_hex_color("#abc"));
        assert!(!is_hex_color("FFECD9"));
        assert!(!is_hex_color("#FFECD"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn clamp_setting_bounds() {
        assert_eq!(clamp_setting(-5), 0);
        assert_eq!(clamp_setting(42), 42);
        assert_eq!(clamp_setting(250), 100);
    }

    #[test]
    fn setting_key_wire_names() {
        assert_eq!(serde_json::to_string(&SettingKey::FanSpeed).unwrap(), "\"fanSpeed\"");
        assert_eq!(
            serde_json::from_str::<SettingKey>("\"lightIntensity\"").unwrap(),
            SettingKey::LightIntensity
        );
    }
}

// commands/mod.rs
use crate::{
    devices::{Device, DeviceState, SettingKey},
    models::Preset,
};

/// Intents a simulator session can dispatch to its device state.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    SetActiveDevice(Device),
    UpdateSetting { key: SettingKey, value: u8 },
    SetLightColor(String),
    TogglePower,
    ApplyPreset(Preset),
}

impl DeviceCommand {
    /// Label used for the `simulator_commands_total` metric.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCommand::SetActiveDevice(_) => "set_active_device",
            DeviceCommand::UpdateSetting { .. } => "update_setting",
            DeviceCommand::SetLightColor(_) => "set_light_color",
            DeviceCommand::TogglePower => "toggle_power",
            DeviceCommand::ApplyPreset(_) => "apply_preset",
        }
    }
}

/// Applies `command` to `state` and returns the resulting state.
pub fn reduce(mut state: DeviceState, command: &DeviceCommand) -> DeviceState {
    match command {
        DeviceCommand::SetActiveDevice(device) => state.set_active_device(*device),
        DeviceCommand::UpdateSetting { key, value } => state.update_setting(*key, *value),
        DeviceCommand::SetLightColor(color) => state.set_light_color(color.as_str()),
        DeviceCommand::TogglePower => state.toggle_power(),
        DeviceCommand::ApplyPreset(preset) => state.apply_preset(preset),
    }
    state
}

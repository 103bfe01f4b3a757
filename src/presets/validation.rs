// validation.rs
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{devices::Device, models::NewPreset};

pub const MAX_NAME_LENGTH: usize = 255;

/// Body of `POST /presets`.
///
/// Fields are kept as raw JSON so a value of the wrong type is reported
/// against its field instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreatePresetRequest {
    #[serde(default)]
    #[schema(value_type = String, max_length = 255, example = "Night Mode")]
    #[validate(custom(function = "validate_name"))]
    pub name: Value,
    #[serde(default)]
    #[schema(value_type = String, example = "Light")]
    #[validate(custom(function = "validate_device"))]
    pub device: Value,
    #[serde(default)]
    #[schema(value_type = Object)]
    #[validate(custom(function = "validate_settings"))]
    pub settings: Value,
}

impl CreatePresetRequest {
    pub fn new(name: impl Into<String>, device: impl Into<String>, settings: Value) -> Self {
        Self {
            name: Value::String(name.into()),
            device: Value::String(device.into()),
            settings,
        }
    }

    /// Validates every field and converts the request into a storable preset.
    pub fn into_new_preset(self) -> Result<NewPreset, ValidationErrors> {
        self.validate()?;

        // The validators above guarantee the shapes matched below.
        let (Value::String(name), Value::String(device), Value::Object(settings)) =
            (self.name, self.device, self.settings)
        else {
            return Err(ValidationErrors::new());
        };
        let device = device
            .parse::<Device>()
            .map_err(|_| ValidationErrors::new())?;

        Ok(NewPreset {
            name: name.trim().to_string(),
            device,
            settings,
        })
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_name(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null => Err(failure("required", "The name field is required.")),
        Value::String(name) if name.trim().is_empty() => {
            Err(failure("required", "The name field is required."))
        }
        Value::String(name) if name.trim().chars().count() > MAX_NAME_LENGTH => Err(failure(
            "max",
            "The name field must not be greater than 255 characters.",
        )),
        Value::String(_) => Ok(()),
        _ => Err(failure("string", "The name field must be a string.")),
    }
}

fn validate_device(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null => Err(failure("required", "The device field is required.")),
        Value::String(device) if device.trim().is_empty() => {
            Err(failure("required", "The device field is required."))
        }
        Value::String(device) => device
            .parse::<Device>()
            .map(|_| ())
            .map_err(|_| failure("in", "The selected device is invalid.")),
        _ => Err(failure("string", "The device field must be a string.")),
    }
}

fn validate_settings(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null => Err(failure("required", "The settings field is required.")),
        Value::Object(settings) if settings.is_empty() => {
            Err(failure("required", "The settings field is required."))
        }
        Value::Object(_) => Ok(()),
        _ => Err(failure("object", "The settings field must be an object.")),
    }
}

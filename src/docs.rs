use utoipa::OpenApi;
use crate::{devices, handlers, models, presets};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::index,
        handlers::list_presets,
        handlers::store_preset,
    ),
    components(
        schemas(
            models::Preset,
            models::PresetSavedResponse,
            models::ValidationErrorResponse,
            models::WsMessage,
            presets::CreatePresetRequest,
            devices::Device,
            devices::DeviceState,
            devices::SettingKey,
        )
    ),
    tags((name = "presets", description = "Saved device presets"))
)]
pub struct ApiDoc;

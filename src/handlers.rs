// handlers.rs

use crate::{
    commands::{self, DeviceCommand},
    devices::{DeviceState, clamp_setting, is_hex_color},
    error::{AppError, field_errors},
    models::{AppState, Preset, PresetSavedResponse, ValidationErrorResponse, WsMessage},
    page,
    presets::CreatePresetRequest,
    utils,
};
use axum::{
    Json,
    extract::{
        State, WebSocketUpgrade,
        rejection::JsonRejection,
        ws::{Message, WebSocket},
    },
    response::{Html, IntoResponse},
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, error, info, warn};

/// Simulator page with the preset list embedded.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Simulator page", content_type = "text/html"))
)]
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let presets = state.presets.list().await?;
    let html = page::render_simulator_page(&presets).map_err(anyhow::Error::from)?;
    Ok(Html(html))
}

/// All presets, newest first.
#[utoipa::path(
    get,
    path = "/presets",
    responses((status = 200, description = "Saved presets", body = [Preset]))
)]
pub async fn list_presets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Preset>>, AppError> {
    Ok(Json(state.presets.list().await?))
}

/// Validates and stores a preset.
#[utoipa::path(
    post,
    path = "/presets",
    request_body = CreatePresetRequest,
    responses(
        (status = 200, description = "Preset saved", body = PresetSavedResponse),
        (status = 400, description = "Body is not valid JSON", body = ValidationErrorResponse),
        (status = 415, description = "Body is not sent as JSON", body = ValidationErrorResponse),
        (status = 422, description = "Invalid field values", body = ValidationErrorResponse)
    )
)]
pub async fn store_preset(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePresetRequest>, JsonRejection>,
) -> Result<Json<PresetSavedResponse>, AppError> {
    let Json(request) = payload?;
    let preset = state.presets.save(request).await?;
    Ok(Json(PresetSavedResponse {
        message: "Preset saved!".to_string(),
        preset,
    }))
}

pub async fn handle_simulator_ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    info!("Simulator connection attempt");
    ws.on_upgrade(|socket| handle_session(socket, state))
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &WsMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).map_err(axum::Error::new)?;
    sender.send(Message::Text(text.into())).await
}

async fn handle_session(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let Some(session_id) = utils::register_session(&state) else {
        warn!(limit = state.max_sessions, "Simulator session limit reached");
        let refusal = WsMessage::Error {
            message: "Too many simulator sessions".into(),
            code: 503,
        };
        let _ = send(&mut sender, &refusal).await;
        let _ = sender.close().await;
        return;
    };

    let mut device = DeviceState::new();
    let greeting = [
        WsMessage::State(device.clone()),
        presets_message(&state).await,
    ];
    let mut connected = true;
    for message in &greeting {
        if send(&mut sender, message).await.is_err() {
            connected = false;
            break;
        }
    }

    while connected {
        let Some(Ok(msg)) = receiver.next().await else {
            break;
        };
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let replies = match serde_json::from_str::<WsMessage>(text.as_str()) {
            Ok(message) => handle_message(&state, &mut device, message).await,
            Err(e) => {
                error!(%session_id, "Invalid message format: {}", e);
                vec![WsMessage::Error {
                    message: format!("Invalid message format: {e}"),
                    code: 400,
                }]
            }
        };

        for reply in &replies {
            if send(&mut sender, reply).await.is_err() {
                connected = false;
                break;
            }
        }
    }

    utils::cleanup_session(session_id, &state);
}

/// Applies one client message to the session's device and returns the
/// messages to send back.
pub async fn handle_message(
    state: &AppState,
    device: &mut DeviceState,
    message: WsMessage,
) -> Vec<WsMessage> {
    match message {
        WsMessage::SetActiveDevice { device: target } => {
            vec![apply(device, DeviceCommand::SetActiveDevice(target))]
        }
        WsMessage::UpdateSetting { key, value } => {
            let value = clamp_setting(value);
            vec![apply(device, DeviceCommand::UpdateSetting { key, value })]
        }
        WsMessage::SetLightColor { color } => {
            if !is_hex_color(&color) {
                return vec![WsMessage::Error {
                    message: format!("Invalid color `{color}`"),
                    code: 422,
                }];
            }
            vec![apply(device, DeviceCommand::SetLightColor(color))]
        }
        WsMessage::TogglePower => vec![apply(device, DeviceCommand::TogglePower)],
        WsMessage::ApplyPreset { preset_id } => match state.presets.find(preset_id).await {
            Ok(preset) => vec![apply(device, DeviceCommand::ApplyPreset(preset))],
            Err(e) => vec![error_message(&e)],
        },
        WsMessage::SavePreset { name } => save_current(state, device, &name).await,
        WsMessage::ListPresets => vec![presets_message(state).await],
        other => {
            debug!(?other, "Ignoring server-side message from client");
            vec![WsMessage::Error {
                message: "Unsupported message".into(),
                code: 400,
            }]
        }
    }
}

fn apply(device: &mut DeviceState, command: DeviceCommand) -> WsMessage {
    metrics::counter!("simulator_commands_total", "command" => command.name()).increment(1);
    *device = commands::reduce(std::mem::take(device), &command);
    WsMessage::State(device.clone())
}

async fn save_current(state: &AppState, device: &DeviceState, name: &str) -> Vec<WsMessage> {
    let name = name.trim();
    if name.is_empty() {
        let mut errors = BTreeMap::new();
        errors.insert(
            "name".to_string(),
            vec!["The preset name field is required.".to_string()],
        );
        return vec![WsMessage::ValidationFailed { errors }];
    }

    let (active, settings) = device.snapshot();
    let request = CreatePresetRequest::new(name, active.as_str(), Value::Object(settings));
    match state.presets.save(request).await {
        Ok(preset) => vec![
            WsMessage::PresetSaved { preset },
            presets_message(state).await,
        ],
        Err(AppError::Validation(errors)) => vec![WsMessage::ValidationFailed {
            errors: field_errors(&errors),
        }],
        Err(e) => vec![error_message(&e)],
    }
}

async fn presets_message(state: &AppState) -> WsMessage {
    match state.presets.list().await {
        Ok(presets) => WsMessage::Presets { presets },
        Err(e) => error_message(&e),
    }
}

fn error_message(err: &AppError) -> WsMessage {
    let status = err.status();
    let message = if status.is_server_error() {
        error!(error = ?err, "Simulator request failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    WsMessage::Error {
        message,
        code: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        devices::{Device, SettingKey},
        presets::PresetService,
    };
    use serde_json::json;

    fn app_state() -> AppState {
        AppState::new(PresetService::in_memory(), 10)
    }

    fn expect_state(replies: Vec<WsMessage>) -> DeviceState {
        match replies.as_slice() {
            [WsMessage::State(state)] => state.clone(),
            other => panic!("expected a single state message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_setting_is_clamped_and_echoed() {
        let state = app_state();
        let mut device = DeviceState::new();
        let reply = expect_state(
            handle_message(
                &state,
                &mut device,
                WsMessage::UpdateSetting { key: SettingKey::FanSpeed, value: 180 },
            )
            .await,
        );
        assert_eq!(reply.fan_speed, 100);
        assert!(reply.is_on);
        assert_eq!(reply, device);
    }

    #[tokio::test]
    async fn invalid_color_is_rejected() {
        let state = app_state();
        let mut device = DeviceState::new();
        let replies = handle_message(
            &state,
            &mut device,
            WsMessage::SetLightColor { color: "red".into() },
        )
        .await;
        assert!(matches!(replies.as_slice(), [WsMessage::Error { code: 422, .. }]));
        assert_eq!(device.light_color, "#FFECD9");
    }

    #[tokio::test]
    async fn save_then_apply_round_trip() {
        let state = app_state();
        let mut device = DeviceState::new();
        for message in [
            WsMessage::SetActiveDevice { device: Device::Light },
            WsMessage::UpdateSetting { key: SettingKey::LightIntensity, value: 20 },
            WsMessage::SetLightColor { color: "#FFECD9".into() },
        ] {
            handle_message(&state, &mut device, message).await;
        }

        let replies = handle_message(
            &state,
            &mut device,
            WsMessage::SavePreset { name: " Night Mode ".into() },
        )
        .await;
        let saved = match replies.as_slice() {
            [WsMessage::PresetSaved { preset }, WsMessage::Presets { presets }] => {
                assert_eq!(presets.first(), Some(preset));
                preset.clone()
            }
            other => panic!("unexpected replies {other:?}"),
        };
        assert_eq!(saved.name, "Night Mode");
        assert_eq!(saved.device, Device::Light);
        assert_eq!(
            Value::Object(saved.settings.clone()),
            json!({ "lightIntensity": 20, "lightColor": "#FFECD9" })
        );

        handle_message(&state, &mut device, WsMessage::TogglePower).await;
        assert!(!device.is_on);

        let applied = expect_state(
            handle_message(&state, &mut device, WsMessage::ApplyPreset { preset_id: saved.id })
                .await,
        );
        assert_eq!(applied.active_device, Device::Light);
        assert_eq!(applied.light_intensity, 20);
        assert!(applied.is_on);
    }

    #[tokio::test]
    async fn blank_name_is_refused_before_saving() {
        let state = app_state();
        let mut device = DeviceState::new();
        let replies =
            handle_message(&state, &mut device, WsMessage::SavePreset { name: "  ".into() }).await;
        match replies.as_slice() {
            [WsMessage::ValidationFailed { errors }] => assert!(errors.contains_key("name")),
            other => panic!("unexpected replies {other:?}"),
        }
        assert!(state.presets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_preset_is_not_found() {
        let state = app_state();
        let mut device = DeviceState::new();
        let replies =
            handle_message(&state, &mut device, WsMessage::ApplyPreset { preset_id: 42 }).await;
        assert!(matches!(replies.as_slice(), [WsMessage::Error { code: 404, .. }]));
    }

    #[tokio::test]
    async fn server_messages_are_not_accepted_from_clients() {
        let state = app_state();
        let mut device = DeviceState::new();
        let replies =
            handle_message(&state, &mut device, WsMessage::State(DeviceState::new())).await;
        assert!(matches!(replies.as_slice(), [WsMessage::Error { code: 400, .. }]));
    }
}

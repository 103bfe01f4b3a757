//! Fan/Light simulator with persisted presets.
//!
//! A web page drives a simulated device through a WebSocket session whose
//! state changes go through a pure reducer ([`commands::reduce`]). Presets
//! are validated and stored by [`presets::PresetService`].

pub mod commands;
pub mod config;
pub mod devices;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod page;
pub mod presets;
pub mod utils;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::*;
use models::AppState;

pub fn build_router(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/presets", get(list_presets).post(store_preset))
        .route("/ws/simulator", get(handle_simulator_ws_upgrade))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", docs::ApiDoc::openapi()))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

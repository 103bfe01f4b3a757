// main.rs
use preset_simulator::{
    build_router,
    config::Settings,
    metrics,
    models::AppState,
    presets::{JsonFilePresetStore, MemoryPresetStore, PresetService, PresetStore},
};
use std::sync::Arc;

fn configure_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configure_logging();

    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if settings.metrics.enabled {
        metrics::setup_metrics(settings.metrics.port)
            .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {}", e))?;
        tracing::info!("Metrics exported on port {}", settings.metrics.port);
    }

    let store: Arc<dyn PresetStore> = match &settings.storage.path {
        Some(path) => Arc::new(
            JsonFilePresetStore::open(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open preset file {}: {}", path, e))?,
        ),
        None => {
            tracing::warn!("No storage path configured, presets are kept in memory");
            Arc::new(MemoryPresetStore::new())
        }
    };

    let state = Arc::new(AppState::new(
        PresetService::new(store),
        settings.server.max_connections as usize,
    ));

    let app = build_router(state, &settings.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind address: {}", e))?;

    tracing::info!("Server started on {}", settings.server.address);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

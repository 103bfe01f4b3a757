// metrics/mod.rs
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Installs the global recorder and serves `/metrics` on `port`.
pub fn setup_metrics(port: u16) -> Result<(), BuildError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!("presets_saved_total", "Presets written to the store");
    metrics::describe_counter!(
        "preset_validation_failures_total",
        "Preset saves rejected by validation"
    );
    metrics::describe_gauge!("simulator_sessions", "Open simulator sessions");
    metrics::describe_counter!(
        "simulator_commands_total",
        "Device commands applied by simulator sessions"
    );
    Ok(())
}

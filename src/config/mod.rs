// config/mod.rs
use config::Config;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub address: String,
    /// Upper bound on simultaneously open simulator sessions.
    pub max_connections: u32,
    pub static_dir: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageSettings {
    /// JSON file holding the presets. Presets live in memory when unset.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::builder("config/config")?.build()?.try_deserialize()
    }

    fn builder(
        file: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        Ok(Config::builder()
            .set_default("server.address", "0.0.0.0:3000")?
            .set_default("server.max_connections", 100)?
            .set_default("server.static_dir", "static")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9000)?
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file() {
        let settings: Settings = Settings::builder("does/not/exist")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.server.max_connections, 100);
        assert_eq!(settings.server.static_dir, "static");
        assert!(settings.storage.path.is_none());
        assert!(!settings.metrics.enabled);
    }
}

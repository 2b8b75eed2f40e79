//! # dpd-config
//!
//! Layered settings: built-in defaults, then an optional TOML file, then
//! `DPD_`-prefixed environment variables (`DPD_SERVER__PORT=9000`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use dpd_core::models::MalformedDataPolicy;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "DPD";
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory backing the durable storage namespace
    pub data_dir: PathBuf,
    pub topics_key: String,
    pub client_id_key: String,
    pub on_malformed: MalformedDataPolicy,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            topics_key: "dpd_topics".to_string(),
            client_id_key: "dpd_user_id".to_string(),
            on_malformed: MalformedDataPolicy::Fail,
        }
    }
}

/// Simulated round-trip windows, in milliseconds.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LatencySettings {
    pub fetch_ms: u64,
    pub mutation_ms: u64,
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            fetch_ms: 1000,
            mutation_ms: 500,
        }
    }
}

impl LatencySettings {
    pub fn fetch(&self) -> Duration {
        Duration::from_millis(self.fetch_ms)
    }

    pub fn mutation(&self) -> Duration {
        Duration::from_millis(self.mutation_ms)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
    /// Fallback filter when `RUST_LOG` is unset (e.g., "info" or "dpd_services=debug")
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub latency: LatencySettings,
    pub log: LogSettings,
}

impl Settings {
    /// Reads `.env` (if any), then the default file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads from `file` (extension optional, may be missing) plus `DPD_*` variables.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.topics_key.trim().is_empty() || self.storage.client_id_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage keys must not be empty".into()));
        }
        if self.storage.topics_key == self.storage.client_id_key {
            return Err(ConfigError::Invalid(
                "topics and client id must use different storage keys".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

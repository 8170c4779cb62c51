//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `plant-collector.toml` in the working directory (or the path in
//! `PLANT_COLLECTOR_CONFIG`). Every field has a sensible default so the file
//! is optional. Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use plant_collector_adapter_ble::BleConfig;
use plant_collector_adapter_ingester::IngesterConfig;

const DEFAULT_PATH: &str = "plant-collector.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Collection loop settings.
    pub collector: CollectorConfig,
    /// Radio settings.
    pub ble: BleConfig,
    /// Ingestion endpoint settings.
    pub ingester: IngesterConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Collection loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Sleep between collection cycles, in seconds.
    pub interval_secs: u32,
    /// Hardware address reported as the collector. Looked up from the host
    /// network interfaces when unset.
    pub mac: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PLANT_COLLECTOR_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.into());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("INGESTER_URL") {
            self.ingester.url = val;
        }
        if let Some(val) = var("COLLECTOR_MAC") {
            self.collector.mac = Some(val);
        }
        if let Some(secs) = var("PLANT_COLLECTOR_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            self.collector.interval_secs = secs;
        }
        if let Some(val) = var("PLANT_COLLECTOR_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.collector.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "collector.interval_secs must be non-zero".to_string(),
            ));
        }
        if self.ble.scan_duration_secs == 0 {
            return Err(ConfigError::Validation(
                "ble.scan_duration_secs must be non-zero".to_string(),
            ));
        }
        if self.ingester.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "ingester.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.ingester.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ingester.url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl CollectorConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            mac: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "plant_collectord=info,plant_collector=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

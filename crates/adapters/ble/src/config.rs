//! BLE adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for scanning and per-device GATT exchanges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BleConfig {
    /// How long each discovery scan listens for advertisements, in seconds.
    pub scan_duration_secs: u16,
    /// Upper bound on connecting and discovering services, in seconds.
    pub connect_timeout_secs: u16,
    /// Upper bound on each write, read, or disconnect, in seconds.
    pub operation_timeout_secs: u16,
    /// Optional MAC address allowlist (e.g. `["C4:7C:8D:6A:12:34"]`).
    ///
    /// When empty, every device advertising the plant sensor service is polled.
    pub device_filter: Vec<String>,
}

impl BleConfig {
    #[must_use]
    pub fn scan_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.scan_duration_secs))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }

    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.operation_timeout_secs))
    }
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            scan_duration_secs: 10,
            connect_timeout_secs: 10,
            operation_timeout_secs: 10,
            device_filter: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = BleConfig::default();
        assert_eq!(config.scan_duration(), Duration::from_secs(10));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.operation_timeout(), Duration::from_secs(10));
        assert!(config.device_filter.is_empty());
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            scan_duration_secs = 5
            connect_timeout_secs = 20
            operation_timeout_secs = 3
            device_filter = ["C4:7C:8D:6A:12:34"]
        "#;
        let config: BleConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.scan_duration_secs, 5);
        assert_eq!(config.connect_timeout_secs, 20);
        assert_eq!(config.operation_timeout_secs, 3);
        assert_eq!(config.device_filter, vec!["C4:7C:8D:6A:12:34".to_owned()]);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: BleConfig = toml::from_str("scan_duration_secs = 30").unwrap();
        assert_eq!(config.scan_duration_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }
}

//! Ingester configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default ingestion endpoint.
pub const DEFAULT_URL: &str = "https://plants.pedanticorderliness.com/metrics";

/// Where and how measurements are delivered.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngesterConfig {
    /// Endpoint receiving `POST` requests with a JSON measurement body.
    pub url: String,
    /// Request timeout, in seconds.
    pub timeout_secs: u16,
}

impl IngesterConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }
}

impl Default for IngesterConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

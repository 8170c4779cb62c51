//! [`HttpIngester`] — JSON over HTTP delivery of measurements.

use reqwest::StatusCode;

use plant_collector_app::ports::Reporter;
use plant_collector_domain::error::ReportError;
use plant_collector_domain::measurement::Measurement;

use crate::config::IngesterConfig;
use crate::error::IngesterError;

/// Reporter posting each measurement to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpIngester {
    client: reqwest::Client,
    url: String,
}

impl HttpIngester {
    /// Build an ingester from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IngesterError::Client`] if the HTTP client cannot be
    /// initialised (e.g. no TLS backend).
    pub fn new(config: &IngesterConfig) -> Result<Self, IngesterError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl Reporter for HttpIngester {
    async fn report(&self, measurement: &Measurement) -> Result<(), ReportError> {
        tracing::debug!(url = %self.url, plant = %measurement.plant, "sending measurement");

        let response = self
            .client
            .post(&self.url)
            .json(measurement)
            .send()
            .await
            .map_err(IngesterError::from)?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(ReportError::UnexpectedStatus(status.as_u16()));
        }

        Ok(())
    }
}

//! Discovery — timed scan filtered to devices advertising the plant sensor
//! service signature.

use std::collections::BTreeSet;
use std::time::Duration;

use plant_collector_domain::address::DeviceAddress;
use plant_collector_domain::advertisement::Advertisement;
use plant_collector_domain::error::ScanError;

use crate::ports::RadioScanner;

/// Finds eligible plant sensors with a single timed scan.
#[derive(Debug, Clone)]
pub struct Discovery {
    scan_duration: Duration,
    device_filter: Vec<String>,
}

impl Discovery {
    /// Create a discovery that scans for `scan_duration`.
    #[must_use]
    pub fn new(scan_duration: Duration) -> Self {
        Self {
            scan_duration,
            device_filter: Vec::new(),
        }
    }

    /// Restrict discovery to the given addresses (case-insensitive).
    ///
    /// An empty list accepts every device advertising the service signature.
    #[must_use]
    pub fn with_device_filter(mut self, device_filter: Vec<String>) -> Self {
        self.device_filter = device_filter;
        self
    }

    /// Run one scan and return the addresses of eligible devices, sorted and
    /// without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the scan itself fails; no device of the
    /// cycle can be known in that case.
    #[tracing::instrument(skip_all, fields(duration_secs = self.scan_duration.as_secs()))]
    pub async fn discover<R: RadioScanner>(
        &self,
        radio: &mut R,
    ) -> Result<Vec<DeviceAddress>, ScanError> {
        let advertisements = radio.scan(self.scan_duration).await?;
        tracing::debug!(observed = advertisements.len(), "scan window closed");

        let eligible = select_eligible(&advertisements)
            .into_iter()
            .filter(|address| {
                let allowed = self.passes_filter(address);
                if !allowed {
                    tracing::debug!(%address, "filtered out by device_filter");
                }
                allowed
            })
            .collect();

        Ok(eligible)
    }

    fn passes_filter(&self, address: &DeviceAddress) -> bool {
        if self.device_filter.is_empty() {
            return true;
        }
        self.device_filter.iter().any(|f| address.matches(f))
    }
}

/// Addresses of every advertisement carrying the service signature.
#[must_use]
pub fn select_eligible(advertisements: &[Advertisement]) -> BTreeSet<DeviceAddress> {
    advertisements
        .iter()
        .filter(|adv| adv.advertises_signature())
        .map(|adv| adv.address.clone())
        .collect()
}

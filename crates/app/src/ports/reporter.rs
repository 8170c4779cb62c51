//! Reporter port — delivery of measurements to the ingestion endpoint.

use std::future::Future;

use plant_collector_domain::error::ReportError;
use plant_collector_domain::measurement::Measurement;

/// Sends a [`Measurement`] to wherever readings are collected.
///
/// Delivery is best-effort and at-most-once: callers log failures and never
/// retry.
pub trait Reporter {
    /// Deliver one measurement.
    fn report(
        &self,
        measurement: &Measurement,
    ) -> impl Future<Output = Result<(), ReportError>> + Send;
}

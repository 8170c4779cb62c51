//! Collection cycle — one discovery-then-poll-all pass.

use tokio::sync::watch;

use plant_collector_domain::address::DeviceAddress;
use plant_collector_domain::collection::{CollectionResult, FailureKind};
use plant_collector_domain::error::ScanError;
use plant_collector_domain::measurement::Measurement;
use plant_collector_domain::reading::SensorReading;
use plant_collector_domain::time;

use crate::ports::{RadioLink, RadioScanner, Reporter};
use crate::services::device_session::DeviceSession;
use crate::services::discovery::Discovery;

/// Orchestrates one full pass: scan, then a fresh [`DeviceSession`] per
/// discovered device, in discovery order, one at a time.
///
/// A failing device never prevents the following devices from being polled.
/// Successful readings are forwarded to the [`Reporter`] once; delivery
/// failures are logged and dropped.
pub struct CollectionCycle<R, P> {
    radio: R,
    reporter: P,
    discovery: Discovery,
    collector: String,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<R, P> CollectionCycle<R, P>
where
    R: RadioScanner + RadioLink,
    P: Reporter,
{
    /// Create a cycle for the collector identified by `collector` (its own
    /// hardware address).
    #[must_use]
    pub fn new(radio: R, reporter: P, discovery: Discovery, collector: impl Into<String>) -> Self {
        Self {
            radio,
            reporter,
            discovery,
            collector: collector.into(),
            shutdown: None,
        }
    }

    /// Stop polling further devices once `shutdown` turns `true`.
    ///
    /// A session already in progress always runs to completion.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run one cycle and return every per-device result in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when discovery fails; no device is polled and
    /// nothing is reported in that case.
    pub async fn run_cycle(&mut self) -> Result<Vec<CollectionResult>, ScanError> {
        let addresses = self.discovery.discover(&mut self.radio).await?;
        tracing::info!(count = addresses.len(), "plant sensor discovery complete");

        let mut results = Vec::with_capacity(addresses.len());
        let mut report_failures = 0_usize;

        for address in addresses {
            if self.shutdown_requested() {
                tracing::info!("shutdown requested, skipping remaining devices");
                break;
            }

            tracing::info!(%address, "found plant sensor");
            let result = DeviceSession::new(&mut self.radio, address).run().await;

            match &result.outcome {
                Ok(reading) => {
                    tracing::info!(
                        address = %result.address,
                        temperature = reading.temperature_celsius,
                        light = reading.light_lux,
                        moisture = reading.moisture_percent,
                        conductivity = reading.conductivity_us_cm,
                        battery = reading.battery_percent,
                        "plant sensor read"
                    );
                    if !self.report(&result.address, reading).await {
                        report_failures += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        address = %result.address,
                        kind = %FailureKind::from(err),
                        error = ?err,
                        "problem communicating with plant sensor"
                    );
                }
            }

            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        tracing::info!(
            polled = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            report_failures,
            "collection cycle complete"
        );

        Ok(results)
    }

    /// Forward a reading to the reporter. Returns `false` when delivery failed.
    async fn report(&self, address: &DeviceAddress, reading: &SensorReading) -> bool {
        let measurement = Measurement::new(
            time::now(),
            self.collector.as_str(),
            address.clone(),
            reading,
        );

        match self.reporter.report(&measurement).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%address, error = ?err, "problem sending measurement to ingester");
                false
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::testing::{FakeDevice, FakeRadio, RecordingReporter, Step};

    const FIRST: &str = "C4:7C:8D:6A:00:01";
    const SECOND: &str = "C4:7C:8D:6A:00:02";
    const THIRD: &str = "C4:7C:8D:6A:00:03";

    fn three_devices_second_failing() -> FakeRadio {
        FakeRadio::new()
            .with_device(FIRST, FakeDevice::healthy())
            .with_device(SECOND, FakeDevice::failing_at(Step::ReadSensor))
            .with_device(THIRD, FakeDevice::healthy())
    }

    fn cycle(
        radio: FakeRadio,
        reporter: RecordingReporter,
    ) -> CollectionCycle<FakeRadio, RecordingReporter> {
        CollectionCycle::new(
            radio,
            reporter,
            Discovery::new(Duration::from_secs(10)),
            "b8:27:eb:00:00:01",
        )
    }

    fn summarize(results: &[CollectionResult]) -> Vec<(DeviceAddress, Option<FailureKind>)> {
        results
            .iter()
            .map(|r| (r.address.clone(), r.failure_kind()))
            .collect()
    }

    #[tokio::test]
    async fn should_continue_past_failing_device() {
        let reporter = RecordingReporter::default();
        let mut cycle = cycle(three_devices_second_failing(), reporter.clone());

        let results = cycle.run_cycle().await.unwrap();

        assert_eq!(
            summarize(&results),
            vec![
                (DeviceAddress::from(FIRST), None),
                (DeviceAddress::from(SECOND), Some(FailureKind::SensorReadFailed)),
                (DeviceAddress::from(THIRD), None),
            ]
        );

        let reported = reporter.reported();
        assert_eq!(reported.len(), 2);
        assert_eq!(reported[0].plant, DeviceAddress::from(FIRST));
        assert_eq!(reported[1].plant, DeviceAddress::from(THIRD));
        assert_eq!(reported[0].collector, "b8:27:eb:00:00:01");
        assert_eq!(reported[0].battery, 99);
    }

    #[tokio::test]
    async fn should_release_every_connection() {
        let radio = three_devices_second_failing();
        let mut cycle = cycle(radio.clone(), RecordingReporter::default());

        cycle.run_cycle().await.unwrap();

        let state = radio.state();
        assert_eq!(state.connects.len(), 3);
        assert_eq!(state.disconnects, state.connects);
    }

    #[tokio::test]
    async fn should_surface_scan_failure_without_polling() {
        let radio = FakeRadio::new()
            .with_device(FIRST, FakeDevice::healthy())
            .failing_scan();
        let reporter = RecordingReporter::default();
        let mut cycle = cycle(radio.clone(), reporter.clone());

        let result = cycle.run_cycle().await;

        assert!(result.is_err());
        assert!(radio.state().connects.is_empty());
        assert!(reporter.reported().is_empty());
    }

    #[tokio::test]
    async fn should_keep_polling_when_reporter_fails() {
        let radio = FakeRadio::new()
            .with_device(FIRST, FakeDevice::healthy())
            .with_device(SECOND, FakeDevice::healthy());
        let reporter = RecordingReporter::failing();
        let mut cycle = cycle(radio.clone(), reporter.clone());

        let results = cycle.run_cycle().await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(CollectionResult::is_success));
        // attempted once each, never retried
        assert_eq!(reporter.reported().len(), 2);
    }

    #[tokio::test]
    async fn should_produce_identical_results_on_repeated_cycles() {
        let mut cycle = cycle(three_devices_second_failing(), RecordingReporter::default());

        let first = cycle.run_cycle().await.unwrap();
        let second = cycle.run_cycle().await.unwrap();

        assert_eq!(summarize(&first), summarize(&second));
        let readings = |results: &[CollectionResult]| {
            results
                .iter()
                .map(|r| r.reading().copied())
                .collect::<Vec<_>>()
        };
        assert_eq!(readings(&first), readings(&second));
    }

    #[tokio::test]
    async fn should_return_no_results_when_nothing_discovered() {
        let reporter = RecordingReporter::default();
        let mut cycle = cycle(FakeRadio::new(), reporter.clone());

        let results = cycle.run_cycle().await.unwrap();

        assert!(results.is_empty());
        assert!(reporter.reported().is_empty());
    }

    #[tokio::test]
    async fn should_skip_devices_once_shutdown_requested() {
        let radio = three_devices_second_failing();
        let (tx, rx) = watch::channel(false);
        let mut cycle = cycle(radio.clone(), RecordingReporter::default()).with_shutdown(rx);

        tx.send(true).unwrap();
        let results = cycle.run_cycle().await.unwrap();

        assert!(results.is_empty());
        assert_eq!(radio.state().scans, 1);
        assert!(radio.state().connects.is_empty());
    }
}

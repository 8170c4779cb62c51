//! [`BtleRadio`] — the radio ports backed by btleplug.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use btleplug::api::{
    BDAddr, Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use tokio_stream::{Stream, StreamExt as _};

use plant_collector_app::ports::{RadioLink, RadioScanner};
use plant_collector_domain::address::DeviceAddress;
use plant_collector_domain::advertisement::{Advertisement, AdvertisementData};
use plant_collector_domain::error::RadioError;
use plant_collector_domain::protocol::{CharacteristicId, SERVICE_UUIDS_AD_TYPE, WriteAck};

use crate::config::BleConfig;
use crate::error::BleError;
use crate::gatt;
use crate::mibeacon::{self, MIBEACON_SERVICE, MiBeaconFrame};

/// AD type of the complete local name entry.
const LOCAL_NAME_AD_TYPE: u8 = 0x09;

/// Host Bluetooth adapter used for both scanning and device sessions.
///
/// The first adapter reported by the platform is opened lazily and reused
/// until a scan fails, after which it is enumerated again.
pub struct BtleRadio {
    config: BleConfig,
    central: Option<Adapter>,
    /// Peripherals seen during the last scan, by rendered address.
    observed: BTreeMap<DeviceAddress, PeripheralId>,
}

impl BtleRadio {
    #[must_use]
    pub fn new(config: BleConfig) -> Self {
        Self {
            config,
            central: None,
            observed: BTreeMap::new(),
        }
    }

    async fn central(&mut self) -> Result<Adapter, BleError> {
        if let Some(central) = &self.central {
            return Ok(central.clone());
        }

        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        let central = adapters.into_iter().next().ok_or(BleError::NotAvailable)?;
        self.central = Some(central.clone());
        Ok(central)
    }

    async fn scan_advertisements(
        &mut self,
        duration: Duration,
    ) -> Result<Vec<Advertisement>, BleError> {
        let central = self.central().await?;
        let events = central.events().await?;

        tracing::debug!(duration_secs = duration.as_secs(), "BLE scan started");
        central.start_scan(ScanFilter::default()).await?;
        let ids = collect_window(events, duration, observed_peripheral).await;
        central.stop_scan().await?;

        self.observed.clear();
        let mut advertisements = Vec::with_capacity(ids.len());
        for id in ids {
            let Ok(peripheral) = central.peripheral(&id).await else {
                continue;
            };
            let Ok(Some(props)) = peripheral.properties().await else {
                continue;
            };
            tracing::trace!(
                address = %props.address,
                name = ?props.local_name,
                "BLE device detected"
            );

            let beacon = props
                .service_data
                .get(&MIBEACON_SERVICE)
                .and_then(|data| decode_beacon(props.address, data));
            let address = peripheral_address(props.address, beacon.as_ref());
            let advertisement =
                advertisement_from(address, props.local_name.as_deref(), &props.services);

            self.observed.insert(advertisement.address.clone(), id);
            advertisements.push(advertisement);
        }

        Ok(advertisements)
    }

    async fn open(&mut self, address: &DeviceAddress) -> Result<Peripheral, BleError> {
        let central = self.central().await?;
        let peripheral = match self.observed.get(address) {
            Some(id) => central.peripheral(id).await?,
            None => {
                let target: BDAddr = address
                    .as_str()
                    .parse()
                    .map_err(|_| BleError::InvalidAddress(address.to_string()))?;
                central
                    .peripherals()
                    .await?
                    .into_iter()
                    .find(|p| p.address() == target)
                    .ok_or_else(|| BleError::PeripheralNotFound(address.to_string()))?
            }
        };

        let limit = self.config.connect_timeout();
        let established = async {
            with_timeout(limit, "connect", peripheral.connect()).await?;
            with_timeout(limit, "service discovery", peripheral.discover_services()).await
        };
        let release = with_timeout(limit, "disconnect", peripheral.disconnect());
        or_release(established, release, address).await?;

        Ok(peripheral)
    }
}

/// Peripheral behind an event that proves the device was on air.
fn observed_peripheral(event: CentralEvent) -> Option<PeripheralId> {
    match event {
        CentralEvent::DeviceDiscovered(id)
        | CentralEvent::DeviceUpdated(id)
        | CentralEvent::ManufacturerDataAdvertisement { id, .. }
        | CentralEvent::ServiceDataAdvertisement { id, .. }
        | CentralEvent::ServicesAdvertisement { id, .. } => Some(id),
        _ => None,
    }
}

/// Drain `events` for `window`, keeping the distinct keys `observe` extracts
/// in first-seen order. Stops early if the stream ends.
async fn collect_window<S, E, K>(
    mut events: S,
    window: Duration,
    observe: impl Fn(E) -> Option<K>,
) -> Vec<K>
where
    S: Stream<Item = E> + Unpin,
    K: Clone + Eq + Hash,
{
    let deadline = tokio::time::Instant::now() + window;
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, events.next()).await {
            Ok(Some(event)) => {
                if let Some(key) = observe(event) {
                    if seen.insert(key.clone()) {
                        keys.push(key);
                    }
                }
            }
            Ok(None) | Err(_) => break,
        }
    }

    keys
}

fn decode_beacon(address: BDAddr, data: &[u8]) -> Option<MiBeaconFrame> {
    match mibeacon::parse_mibeacon(data) {
        Ok(frame) => {
            if let Some(event) = &frame.event {
                tracing::debug!(
                    %address,
                    product_id = frame.product_id,
                    version = frame.version,
                    counter = frame.counter,
                    %event,
                    "MiBeacon event"
                );
            }
            Some(frame)
        }
        Err(err) => {
            tracing::debug!(%address, error = ?err, "unparsable MiBeacon frame");
            None
        }
    }
}

/// Address used to identify a peripheral. Some platforms report a zeroed
/// hardware address; the MAC carried in `MiBeacon` frames stands in for it.
fn peripheral_address(address: BDAddr, beacon: Option<&MiBeaconFrame>) -> DeviceAddress {
    if address == BDAddr::default() {
        if let Some(mac) = beacon.and_then(|frame| frame.address.clone()) {
            return mac;
        }
    }
    DeviceAddress::new(address.to_string())
}

/// Render a peripheral's advertised properties as advertisement entries.
///
/// Service UUIDs become [`SERVICE_UUIDS_AD_TYPE`] entries rendered as
/// lowercase hyphenated strings; the local name, if any, comes first.
fn advertisement_from(
    address: DeviceAddress,
    local_name: Option<&str>,
    services: &[uuid::Uuid],
) -> Advertisement {
    let name = local_name.map(|name| AdvertisementData::new(LOCAL_NAME_AD_TYPE, name));
    let services = services
        .iter()
        .map(|uuid| AdvertisementData::new(SERVICE_UUIDS_AD_TYPE, uuid.to_string()));

    Advertisement {
        address,
        data: name.into_iter().chain(services).collect(),
    }
}

async fn with_timeout<T>(
    limit: Duration,
    operation: &'static str,
    fut: impl Future<Output = Result<T, btleplug::Error>>,
) -> Result<T, BleError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(BleError::Timeout { operation }),
    }
}

/// Await `attempt`, running `release` when it fails. Dropping a pending
/// connect does not cancel it on the host stack, so the link is closed
/// explicitly.
async fn or_release<T>(
    attempt: impl Future<Output = Result<T, BleError>>,
    release: impl Future<Output = Result<(), BleError>>,
    address: &DeviceAddress,
) -> Result<T, BleError> {
    match attempt.await {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Err(release_err) = release.await {
                tracing::warn!(
                    %address,
                    error = ?release_err,
                    "failed to release link after failed connect"
                );
            }
            Err(err)
        }
    }
}

/// Forget the cached adapter once a scan has failed.
fn forget_on_error<A, T>(
    central: &mut Option<A>,
    result: Result<T, BleError>,
) -> Result<T, BleError> {
    if result.is_err() && central.take().is_some() {
        tracing::debug!("dropping cached BLE adapter after failed scan");
    }
    result
}

impl RadioScanner for BtleRadio {
    async fn scan(&mut self, duration: Duration) -> Result<Vec<Advertisement>, RadioError> {
        let result = self.scan_advertisements(duration).await;
        Ok(forget_on_error(&mut self.central, result)?)
    }
}

impl RadioLink for BtleRadio {
    type Connection = Peripheral;

    async fn connect(&mut self, address: &DeviceAddress) -> Result<Peripheral, RadioError> {
        Ok(self.open(address).await?)
    }

    async fn write_characteristic(
        &mut self,
        connection: &Peripheral,
        id: CharacteristicId,
        value: &[u8],
        ack: WriteAck,
    ) -> Result<(), RadioError> {
        let characteristic = gatt::find_characteristic(connection, id)?;
        let write_type = match ack {
            WriteAck::Required => WriteType::WithResponse,
            WriteAck::None => WriteType::WithoutResponse,
        };
        with_timeout(
            self.config.operation_timeout(),
            "write",
            connection.write(&characteristic, value, write_type),
        )
        .await?;
        Ok(())
    }

    async fn read_characteristic(
        &mut self,
        connection: &Peripheral,
        id: CharacteristicId,
    ) -> Result<Vec<u8>, RadioError> {
        let characteristic = gatt::find_characteristic(connection, id)?;
        let value = with_timeout(
            self.config.operation_timeout(),
            "read",
            connection.read(&characteristic),
        )
        .await?;
        Ok(value)
    }

    async fn disconnect(&mut self, connection: Peripheral) -> Result<(), RadioError> {
        with_timeout(
            self.config.operation_timeout(),
            "disconnect",
            connection.disconnect(),
        )
        .await?;
        Ok(())
    }
}

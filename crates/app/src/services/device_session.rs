//! Device session — one connection to one plant sensor.
//!
//! # Protocol
//!
//! 1. Connect to the device
//! 2. Write `[0xa0, 0x1f]` to the command characteristic, acknowledged
//! 3. Read and decode the sensor-data characteristic
//! 4. Read and decode the battery characteristic
//! 5. Disconnect — on every path once step 1 has succeeded
//! 6. Combine both blocks into a [`SensorReading`]
//!
//! No step is retried; a failed session is reported once and the device is
//! skipped until the next discovery.

use plant_collector_domain::address::DeviceAddress;
use plant_collector_domain::codec;
use plant_collector_domain::collection::CollectionResult;
use plant_collector_domain::error::SessionError;
use plant_collector_domain::protocol::{
    BATTERY_CHARACTERISTIC, COMMAND_CHARACTERISTIC, ENABLE_SENSORS_COMMAND, SENSOR_CHARACTERISTIC,
    WriteAck,
};
use plant_collector_domain::reading::SensorReading;

use crate::ports::RadioLink;

/// Drives the protocol exchange with a single device.
///
/// Holds the radio exclusively for its whole lifetime.
pub struct DeviceSession<'r, R> {
    radio: &'r mut R,
    address: DeviceAddress,
}

impl<'r, R: RadioLink> DeviceSession<'r, R> {
    #[must_use]
    pub fn new(radio: &'r mut R, address: DeviceAddress) -> Self {
        Self { radio, address }
    }

    /// Run the exchange and translate it into a [`CollectionResult`].
    ///
    /// The connection is always closed before returning, whichever step
    /// failed. A failed disconnect is logged and does not change the result.
    #[tracing::instrument(skip_all, fields(address = %self.address))]
    pub async fn run(self) -> CollectionResult {
        let Self { radio, address } = self;

        tracing::debug!("connecting");
        let connection = match radio.connect(&address).await {
            Ok(connection) => connection,
            Err(err) => {
                return CollectionResult::failure(address, SessionError::ConnectFailed(err));
            }
        };
        tracing::debug!("connected");

        let outcome = exchange(radio, &connection).await;

        tracing::debug!("disconnecting");
        if let Err(err) = radio.disconnect(connection).await {
            tracing::warn!(error = ?err, "failed to disconnect plant sensor");
        }

        CollectionResult { address, outcome }
    }
}

/// Steps 2–4, separated so the caller can always disconnect.
async fn exchange<R: RadioLink>(
    radio: &mut R,
    connection: &R::Connection,
) -> Result<SensorReading, SessionError> {
    radio
        .write_characteristic(
            connection,
            COMMAND_CHARACTERISTIC,
            &ENABLE_SENSORS_COMMAND,
            WriteAck::Required,
        )
        .await
        .map_err(SessionError::CommandWriteFailed)?;
    tracing::debug!("enabled sensor reading");

    let sensor_bytes = radio
        .read_characteristic(connection, SENSOR_CHARACTERISTIC)
        .await
        .map_err(SessionError::SensorReadFailed)?;
    tracing::debug!(payload = %format_hex(&sensor_bytes), "sensor data");
    let block = codec::decode_sensor_block(&sensor_bytes)?;

    let battery_bytes = radio
        .read_characteristic(connection, BATTERY_CHARACTERISTIC)
        .await
        .map_err(SessionError::BatteryReadFailed)?;
    tracing::debug!(payload = %format_hex(&battery_bytes), "battery data");
    let battery = codec::decode_battery_block(&battery_bytes)?;

    Ok(SensorReading::new(block, battery))
}

/// Render bytes as colon-separated lowercase hex (e.g. `d7:00:ff`).
fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

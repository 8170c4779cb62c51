//! Wire constants for the plant sensor (Mi Flora, HHCCJCY01) GATT exchange.
//!
//! These values are part of the device protocol and must not change.

use std::fmt;

/// Service UUID a device must advertise to be treated as a plant sensor.
pub const SERVICE_SIGNATURE: &str = "0000fe95-0000-1000-8000-00805f9b34fb";

/// Advertisement data type carrying the service UUID list that is matched
/// against [`SERVICE_SIGNATURE`].
pub const SERVICE_UUIDS_AD_TYPE: u8 = 0x02;

/// Value written to [`COMMAND_CHARACTERISTIC`] to switch on live sensor readout.
pub const ENABLE_SENSORS_COMMAND: [u8; 2] = [0xA0, 0x1F];

/// Writable command register.
pub const COMMAND_CHARACTERISTIC: CharacteristicId = CharacteristicId(0x0033);

/// Sensor data register (temperature, light, moisture, conductivity).
pub const SENSOR_CHARACTERISTIC: CharacteristicId = CharacteristicId(0x0035);

/// Battery and firmware register; byte 0 is the battery percentage.
pub const BATTERY_CHARACTERISTIC: CharacteristicId = CharacteristicId(0x0038);

/// GATT attribute handle identifying a characteristic on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacteristicId(pub u16);

impl fmt::Display for CharacteristicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Whether a characteristic write must be acknowledged by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAck {
    /// Wait for the device to confirm the write.
    Required,
    /// Fire and forget.
    None,
}

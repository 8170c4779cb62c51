//! GATT helpers for the Mi Flora characteristics.
//!
//! The collection core addresses characteristics by attribute handle;
//! btleplug addresses them by UUID. This module maps one to the other.

use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::Peripheral;

use plant_collector_domain::protocol::{
    BATTERY_CHARACTERISTIC, COMMAND_CHARACTERISTIC, CharacteristicId, SENSOR_CHARACTERISTIC,
};

use crate::error::BleError;

/// GATT characteristic UUID for the Mi Flora CMD register (handle `0x0033`).
pub(crate) const CMD_CHAR: uuid::Uuid = uuid::Uuid::from_u128(0x0000_1a00_0000_1000_8000_0080_5f9b_34fb);

/// GATT characteristic UUID for the Mi Flora DATA register (handle `0x0035`).
pub(crate) const DATA_CHAR: uuid::Uuid = uuid::Uuid::from_u128(0x0000_1a01_0000_1000_8000_0080_5f9b_34fb);

/// GATT characteristic UUID for the Mi Flora FIRMWARE register (handle
/// `0x0038`, battery + version).
pub(crate) const FIRMWARE_CHAR: uuid::Uuid =
    uuid::Uuid::from_u128(0x0000_1a02_0000_1000_8000_0080_5f9b_34fb);

/// UUID of the characteristic living at handle `id`.
///
/// # Errors
///
/// Returns [`BleError::UnknownCharacteristic`] for handles outside the
/// plant sensor protocol.
pub(crate) fn characteristic_uuid(id: CharacteristicId) -> Result<uuid::Uuid, BleError> {
    match id {
        COMMAND_CHARACTERISTIC => Ok(CMD_CHAR),
        SENSOR_CHARACTERISTIC => Ok(DATA_CHAR),
        BATTERY_CHARACTERISTIC => Ok(FIRMWARE_CHAR),
        CharacteristicId(other) => Err(BleError::UnknownCharacteristic(other)),
    }
}

/// Find a GATT characteristic by handle on a peripheral that has already
/// discovered its services.
///
/// # Errors
///
/// Returns [`BleError::UnknownCharacteristic`] or
/// [`BleError::CharacteristicNotFound`].
pub(crate) fn find_characteristic(
    peripheral: &Peripheral,
    id: CharacteristicId,
) -> Result<Characteristic, BleError> {
    let uuid = characteristic_uuid(id)?;
    peripheral
        .characteristics()
        .into_iter()
        .find(|c| c.uuid == uuid)
        .ok_or(BleError::CharacteristicNotFound { uuid })
}

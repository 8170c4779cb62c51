//! BLE adapter error types.

use plant_collector_domain::error::RadioError;

/// Errors specific to the BLE adapter.
#[derive(Debug, thiserror::Error)]
pub enum BleError {
    /// No BLE adapter found on the host.
    #[error("no BLE adapter available")]
    NotAvailable,

    /// A btleplug operation failed.
    #[error("BLE operation failed")]
    Btle(#[from] btleplug::Error),

    /// The address is not a valid `AA:BB:CC:DD:EE:FF` hardware address.
    #[error("invalid device address {0}")]
    InvalidAddress(String),

    /// The device was not seen by the adapter.
    #[error("peripheral {0} not found")]
    PeripheralNotFound(String),

    /// No GATT UUID is known for the requested handle.
    #[error("unknown characteristic handle {0:#06x}")]
    UnknownCharacteristic(u16),

    /// The connected device does not expose the characteristic.
    #[error("characteristic {uuid} not found")]
    CharacteristicNotFound {
        /// UUID that was looked up.
        uuid: uuid::Uuid,
    },

    /// An advertisement payload could not be parsed.
    #[error("failed to parse BLE payload")]
    PayloadParse(#[source] PayloadParseError),

    /// The operation did not complete in time.
    #[error("{operation} timed out")]
    Timeout {
        /// Which operation was running.
        operation: &'static str,
    },
}

/// Why a `MiBeacon` service data frame could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum PayloadParseError {
    /// The frame ends before a field announced by its frame control.
    #[error("MiBeacon frame must be at least {expected} bytes, got {actual}")]
    TooShort {
        /// Bytes needed to read the announced fields.
        expected: usize,
        /// Bytes received.
        actual: usize,
    },

    /// The event payload is encrypted with a bind key we do not have.
    #[error("encrypted MiBeacon frames are not supported")]
    Encrypted,

    /// The event value is shorter than its type requires.
    #[error("MiBeacon event {kind:#06x} needs {expected} value bytes, got {actual}")]
    EventTooShort {
        /// Event type.
        kind: u16,
        /// Bytes the event type requires.
        expected: usize,
        /// Bytes announced by the frame.
        actual: usize,
    },
}

impl From<BleError> for RadioError {
    fn from(err: BleError) -> Self {
        RadioError::new(err)
    }
}

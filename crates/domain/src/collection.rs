//! Per-device outcome of a collection cycle.

use std::fmt;

use crate::address::DeviceAddress;
use crate::error::SessionError;
use crate::reading::SensorReading;

/// Outcome of one device session, tagged with the device it came from.
#[derive(Debug)]
pub struct CollectionResult {
    /// Device the session talked to.
    pub address: DeviceAddress,
    /// The reading, or why it could not be taken.
    pub outcome: Result<SensorReading, SessionError>,
}

impl CollectionResult {
    /// A successful session.
    #[must_use]
    pub fn success(address: DeviceAddress, reading: SensorReading) -> Self {
        Self {
            address,
            outcome: Ok(reading),
        }
    }

    /// A failed session.
    #[must_use]
    pub fn failure(address: DeviceAddress, error: SessionError) -> Self {
        Self {
            address,
            outcome: Err(error),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The reading, if the session succeeded.
    #[must_use]
    pub fn reading(&self) -> Option<&SensorReading> {
        self.outcome.as_ref().ok()
    }

    /// The failure cause, if the session failed.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.outcome.as_ref().err().map(FailureKind::from)
    }
}

/// Which step of the device session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ConnectFailed,
    CommandWriteFailed,
    SensorReadFailed,
    MalformedPayload,
    BatteryReadFailed,
}

impl From<&SessionError> for FailureKind {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::ConnectFailed(_) => Self::ConnectFailed,
            SessionError::CommandWriteFailed(_) => Self::CommandWriteFailed,
            SessionError::SensorReadFailed(_) => Self::SensorReadFailed,
            SessionError::MalformedPayload(_) => Self::MalformedPayload,
            SessionError::BatteryReadFailed(_) => Self::BatteryReadFailed,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ConnectFailed => "connect_failed",
            Self::CommandWriteFailed => "command_write_failed",
            Self::SensorReadFailed => "sensor_read_failed",
            Self::MalformedPayload => "malformed_payload",
            Self::BatteryReadFailed => "battery_read_failed",
        };
        f.write_str(name)
    }
}

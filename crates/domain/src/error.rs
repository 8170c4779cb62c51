//! Error taxonomy shared across the workspace.
//!
//! Each layer defines its own typed errors and converts into these at the
//! port boundaries. Transport failures from adapters are carried as opaque
//! boxed sources so the core never depends on a concrete radio or HTTP stack.

/// Boxed error used to carry adapter-specific failures across ports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A payload did not have the shape the codec expects.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The payload is shorter than the fixed layout requires.
    #[error("{block} block must be at least {expected} bytes, got {actual}")]
    TooShort {
        /// Which block was being decoded (e.g. `"sensor"`, `"battery"`).
        block: &'static str,
        /// Minimum byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
}

/// A failure reported by the radio adapter (scan, connect, write, read,
/// disconnect).
#[derive(Debug, thiserror::Error)]
#[error("radio transport error")]
pub struct RadioError(#[source] BoxError);

impl RadioError {
    /// Wrap an adapter error.
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }
}

/// Why a single device session failed.
///
/// Every variant is recovered by the collection cycle: the device is skipped
/// until the next discovery.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection could not be opened.
    #[error("failed to connect")]
    ConnectFailed(#[source] RadioError),

    /// The enable-sensors command was not acknowledged.
    #[error("failed to write enable-sensors command")]
    CommandWriteFailed(#[source] RadioError),

    /// The sensor-data characteristic could not be read.
    #[error("failed to read sensor data")]
    SensorReadFailed(#[source] RadioError),

    /// A characteristic was read but its payload could not be decoded.
    #[error("malformed payload")]
    MalformedPayload(#[from] PayloadError),

    /// The battery characteristic could not be read.
    #[error("failed to read battery level")]
    BatteryReadFailed(#[source] RadioError),
}

/// The discovery scan failed; no device of the cycle can be known.
#[derive(Debug, thiserror::Error)]
#[error("discovery scan failed")]
pub struct ScanError(#[from] pub RadioError);

/// A reading could not be delivered to the ingestion endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The request could not be sent or no response was received.
    #[error("failed to send measurement")]
    Transport(#[source] BoxError),

    /// The endpoint answered with something other than `204 No Content`.
    #[error("ingester responded with status {0}")]
    UnexpectedStatus(u16),
}

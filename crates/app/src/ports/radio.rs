//! Radio ports — scanning for advertisements and talking to one device.
//!
//! Every method takes `&mut self`: the radio adapter is a single shared
//! resource, and exclusive borrows guarantee that at most one scan or one
//! open connection uses it at a time.

use std::future::Future;
use std::time::Duration;

use plant_collector_domain::address::DeviceAddress;
use plant_collector_domain::advertisement::Advertisement;
use plant_collector_domain::error::RadioError;
use plant_collector_domain::protocol::{CharacteristicId, WriteAck};

/// Timed scan over the radio medium.
pub trait RadioScanner {
    /// Scan for `duration` and return every device observed with its
    /// advertisement data.
    fn scan(
        &mut self,
        duration: Duration,
    ) -> impl Future<Output = Result<Vec<Advertisement>, RadioError>> + Send;
}

/// Point-to-point link to a single device.
///
/// A [`Connection`](Self::Connection) is obtained from
/// [`connect`](Self::connect) and consumed by
/// [`disconnect`](Self::disconnect), so a handle can be closed at most once.
pub trait RadioLink {
    /// Handle for an open connection.
    type Connection: Send + Sync;

    /// Open a connection to the device at `address`.
    fn connect(
        &mut self,
        address: &DeviceAddress,
    ) -> impl Future<Output = Result<Self::Connection, RadioError>> + Send;

    /// Write `value` to the characteristic identified by `id`.
    fn write_characteristic(
        &mut self,
        connection: &Self::Connection,
        id: CharacteristicId,
        value: &[u8],
        ack: WriteAck,
    ) -> impl Future<Output = Result<(), RadioError>> + Send;

    /// Read the current value of the characteristic identified by `id`.
    fn read_characteristic(
        &mut self,
        connection: &Self::Connection,
        id: CharacteristicId,
    ) -> impl Future<Output = Result<Vec<u8>, RadioError>> + Send;

    /// Close the connection.
    fn disconnect(
        &mut self,
        connection: Self::Connection,
    ) -> impl Future<Output = Result<(), RadioError>> + Send;
}

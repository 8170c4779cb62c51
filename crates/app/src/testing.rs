//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use plant_collector_domain::address::DeviceAddress;
use plant_collector_domain::advertisement::{Advertisement, AdvertisementData};
use plant_collector_domain::error::{RadioError, ReportError};
use plant_collector_domain::measurement::Measurement;
use plant_collector_domain::protocol::{
    BATTERY_CHARACTERISTIC, CharacteristicId, SENSOR_CHARACTERISTIC, SERVICE_SIGNATURE,
    SERVICE_UUIDS_AD_TYPE, WriteAck,
};

use crate::ports::{RadioLink, RadioScanner, Reporter};

/// Protocol step a [`FakeDevice`] can be told to fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Connect,
    Write,
    ReadSensor,
    ReadBattery,
}

#[derive(Debug, Clone)]
pub struct FakeDevice {
    fail_at: Option<Step>,
    fail_disconnect: bool,
    sensor_payload: Vec<u8>,
    battery_payload: Vec<u8>,
}

impl FakeDevice {
    /// A device answering with 21.5 °C, 1000 lux, 42 %, 300 µS/cm, 99 % battery.
    pub fn healthy() -> Self {
        Self {
            fail_at: None,
            fail_disconnect: false,
            sensor_payload: vec![
                0xD7, 0x00, 0xFF, 0xE8, 0x03, 0x00, 0x00, 0x2A, 0x2C, 0x01, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00,
            ],
            battery_payload: vec![0x63, 0x13, b'3', b'.', b'1', b'.', b'8'],
        }
    }

    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::healthy()
        }
    }

    pub fn with_sensor_payload(mut self, payload: Vec<u8>) -> Self {
        self.sensor_payload = payload;
        self
    }

    pub fn with_battery_payload(mut self, payload: Vec<u8>) -> Self {
        self.battery_payload = payload;
        self
    }

    pub fn with_failing_disconnect(mut self) -> Self {
        self.fail_disconnect = true;
        self
    }

    fn fails_at(&self, step: Step) -> bool {
        self.fail_at == Some(step)
    }
}

/// Everything the fake radio was configured with and every call it received.
#[derive(Debug, Default)]
pub struct FakeState {
    pub advertisements: Vec<Advertisement>,
    pub scan_fails: bool,
    pub devices: HashMap<DeviceAddress, FakeDevice>,
    pub scans: usize,
    pub last_scan_duration: Option<Duration>,
    pub connects: Vec<DeviceAddress>,
    pub disconnects: Vec<DeviceAddress>,
    pub writes: Vec<(CharacteristicId, Vec<u8>, WriteAck)>,
    pub reads: Vec<CharacteristicId>,
    /// Device currently connected, if any.
    pub open: Option<DeviceAddress>,
}

/// Scriptable radio. Clones share state, so a test can keep a handle while
/// the service under test owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeRadio {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Debug)]
pub struct FakeConnection {
    address: DeviceAddress,
}

impl FakeRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device that advertises the plant sensor signature.
    pub fn with_device(self, address: &str, device: FakeDevice) -> Self {
        let address = DeviceAddress::from(address);
        {
            let mut state = self.state();
            state.advertisements.push(Advertisement {
                address: address.clone(),
                data: vec![AdvertisementData::new(
                    SERVICE_UUIDS_AD_TYPE,
                    SERVICE_SIGNATURE,
                )],
            });
            state.devices.insert(address, device);
        }
        self
    }

    pub fn with_advertisement(self, advertisement: Advertisement) -> Self {
        self.state().advertisements.push(advertisement);
        self
    }

    pub fn failing_scan(self) -> Self {
        self.state().scan_fails = true;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn device_for(state: &FakeState, address: &DeviceAddress) -> Option<FakeDevice> {
        state.devices.get(address).cloned()
    }
}

impl RadioScanner for FakeRadio {
    fn scan(
        &mut self,
        duration: Duration,
    ) -> impl Future<Output = Result<Vec<Advertisement>, RadioError>> + Send {
        let mut state = self.state();
        state.scans += 1;
        state.last_scan_duration = Some(duration);
        let result = if state.scan_fails {
            Err(RadioError::new("adapter unavailable"))
        } else {
            Ok(state.advertisements.clone())
        };
        async move { result }
    }
}

impl RadioLink for FakeRadio {
    type Connection = FakeConnection;

    fn connect(
        &mut self,
        address: &DeviceAddress,
    ) -> impl Future<Output = Result<FakeConnection, RadioError>> + Send {
        let mut state = self.state();
        assert!(state.open.is_none(), "radio used by two sessions at once");
        state.connects.push(address.clone());

        let result = match Self::device_for(&state, address) {
            Some(device) if !device.fails_at(Step::Connect) => {
                state.open = Some(address.clone());
                Ok(FakeConnection {
                    address: address.clone(),
                })
            }
            Some(_) => Err(RadioError::new("connection refused")),
            None => Err(RadioError::new("peripheral not found")),
        };
        async move { result }
    }

    fn write_characteristic(
        &mut self,
        connection: &FakeConnection,
        id: CharacteristicId,
        value: &[u8],
        ack: WriteAck,
    ) -> impl Future<Output = Result<(), RadioError>> + Send {
        let mut state = self.state();
        state.writes.push((id, value.to_vec(), ack));
        let device = Self::device_for(&state, &connection.address);
        let result = match device {
            Some(device) if !device.fails_at(Step::Write) => Ok(()),
            _ => Err(RadioError::new("write not acknowledged")),
        };
        async move { result }
    }

    fn read_characteristic(
        &mut self,
        connection: &FakeConnection,
        id: CharacteristicId,
    ) -> impl Future<Output = Result<Vec<u8>, RadioError>> + Send {
        let mut state = self.state();
        state.reads.push(id);
        let device = Self::device_for(&state, &connection.address);
        let result = match device {
            Some(device) if id == SENSOR_CHARACTERISTIC && !device.fails_at(Step::ReadSensor) => {
                Ok(device.sensor_payload)
            }
            Some(device) if id == BATTERY_CHARACTERISTIC && !device.fails_at(Step::ReadBattery) => {
                Ok(device.battery_payload)
            }
            _ => Err(RadioError::new("read failed")),
        };
        async move { result }
    }

    fn disconnect(
        &mut self,
        connection: FakeConnection,
    ) -> impl Future<Output = Result<(), RadioError>> + Send {
        let mut state = self.state();
        state.open = None;
        let fails = Self::device_for(&state, &connection.address)
            .is_some_and(|device| device.fail_disconnect);
        state.disconnects.push(connection.address);
        let result = if fails {
            Err(RadioError::new("already disconnected"))
        } else {
            Ok(())
        };
        async move { result }
    }
}

/// Reporter that records every measurement it is handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reported: Arc<Mutex<Vec<Measurement>>>,
    fail: bool,
}

impl RecordingReporter {
    /// A reporter whose deliveries all fail (after being recorded).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn reported(&self) -> Vec<Measurement> {
        self.reported.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(
        &self,
        measurement: &Measurement,
    ) -> impl Future<Output = Result<(), ReportError>> + Send {
        self.reported.lock().unwrap().push(measurement.clone());
        let result = if self.fail {
            Err(ReportError::UnexpectedStatus(500))
        } else {
            Ok(())
        };
        async move { result }
    }
}

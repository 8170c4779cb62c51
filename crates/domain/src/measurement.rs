//! The record sent to the ingestion endpoint.

use serde::{Serialize, Serializer};

use crate::address::DeviceAddress;
use crate::reading::SensorReading;
use crate::time::{self, Timestamp};

/// A reading paired with capture metadata, ready for reporting.
///
/// Serialises to the ingester's JSON shape:
/// `{"time", "collector", "plant", "temp", "light", "moist", "cond", "battery"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Capture time, rendered as ISO-8601 UTC with a trailing `Z`.
    #[serde(serialize_with = "serialize_time")]
    pub time: Timestamp,
    /// Hardware address of the collector host.
    pub collector: String,
    /// Address of the plant sensor.
    pub plant: DeviceAddress,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub light: u32,
    #[serde(rename = "moist")]
    pub moisture: u8,
    #[serde(rename = "cond")]
    pub conductivity: u16,
    pub battery: u8,
}

impl Measurement {
    /// Build a measurement from a reading taken at `time`.
    #[must_use]
    pub fn new(
        time: Timestamp,
        collector: impl Into<String>,
        plant: DeviceAddress,
        reading: &SensorReading,
    ) -> Self {
        Self {
            time,
            collector: collector.into(),
            plant,
            temperature: reading.temperature_celsius,
            light: reading.light_lux,
            moisture: reading.moisture_percent,
            conductivity: reading.conductivity_us_cm,
            battery: reading.battery_percent,
        }
    }
}

fn serialize_time<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time::format_iso8601(ts))
}

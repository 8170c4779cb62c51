//! Decoded sensor values.

/// Values decoded from the sensor-data characteristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorBlock {
    /// Temperature in degrees Celsius, one decimal place.
    pub temperature_celsius: f64,
    /// Light intensity in lux.
    pub light_lux: u32,
    /// Soil moisture percentage.
    pub moisture_percent: u8,
    /// Soil conductivity in µS/cm.
    pub conductivity_us_cm: u16,
}

/// A complete reading from one plant sensor.
///
/// Only built from a decoded [`SensorBlock`] plus a decoded battery level, so
/// a reading is never partially populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Temperature in degrees Celsius, one decimal place.
    pub temperature_celsius: f64,
    /// Light intensity in lux.
    pub light_lux: u32,
    /// Soil moisture percentage.
    pub moisture_percent: u8,
    /// Soil conductivity in µS/cm.
    pub conductivity_us_cm: u16,
    /// Battery level percentage.
    pub battery_percent: u8,
}

impl SensorReading {
    /// Combine a sensor block with the battery level read after it.
    #[must_use]
    pub fn new(block: SensorBlock, battery_percent: u8) -> Self {
        Self {
            temperature_celsius: block.temperature_celsius,
            light_lux: block.light_lux,
            moisture_percent: block.moisture_percent,
            conductivity_us_cm: block.conductivity_us_cm,
            battery_percent,
        }
    }
}

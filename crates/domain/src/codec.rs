//! Binary codec for the sensor and battery characteristic payloads.
//!
//! Pure functions operating on raw `&[u8]` slices — no radio dependency
//! needed. Trailing bytes beyond the fixed layout are ignored.

use crate::error::PayloadError;
use crate::reading::SensorBlock;

const SENSOR_BLOCK_MIN_LEN: usize = 10;
const BATTERY_BLOCK_MIN_LEN: usize = 1;

/// Decode the sensor-data characteristic payload (little-endian).
///
/// | Bytes | Type | Field |
/// |-------|------|-------|
/// | 0–1 | u16 LE (×0.1 °C) | Temperature |
/// | 2 | — | Padding |
/// | 3–6 | u32 LE (lux) | Light |
/// | 7 | u8 (%) | Moisture |
/// | 8–9 | u16 LE (µS/cm) | Conductivity |
///
/// Byte 2 is never read.
///
/// # Errors
///
/// Returns [`PayloadError::TooShort`] when fewer than 10 bytes are given.
pub fn decode_sensor_block(data: &[u8]) -> Result<SensorBlock, PayloadError> {
    if data.len() < SENSOR_BLOCK_MIN_LEN {
        return Err(PayloadError::TooShort {
            block: "sensor",
            expected: SENSOR_BLOCK_MIN_LEN,
            actual: data.len(),
        });
    }

    let temp_raw = u16::from_le_bytes([data[0], data[1]]);
    let light = u32::from_le_bytes([data[3], data[4], data[5], data[6]]);
    let moisture = data[7];
    let conductivity = u16::from_le_bytes([data[8], data[9]]);

    Ok(SensorBlock {
        temperature_celsius: f64::from(temp_raw) / 10.0,
        light_lux: light,
        moisture_percent: moisture,
        conductivity_us_cm: conductivity,
    })
}

/// Decode the battery characteristic payload: byte 0 is the battery
/// percentage, the rest (firmware version) is ignored.
///
/// # Errors
///
/// Returns [`PayloadError::TooShort`] when the payload is empty.
pub fn decode_battery_block(data: &[u8]) -> Result<u8, PayloadError> {
    if data.len() < BATTERY_BLOCK_MIN_LEN {
        return Err(PayloadError::TooShort {
            block: "battery",
            expected: BATTERY_BLOCK_MIN_LEN,
            actual: data.len(),
        });
    }

    Ok(data[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sensor_payload() -> [u8; 10] {
        [
            0xD7, 0x00, // temp: 215 → 21.5 °C
            0xFF, // padding
            0xE8, 0x03, 0x00, 0x00, // light: 1000 lux
            0x2A, // moisture: 42 %
            0x2C, 0x01, // conductivity: 300 µS/cm
        ]
    }

    // ── Sensor block ────────────────────────────────────────────────────

    #[test]
    fn should_decode_sensor_block_skipping_padding_byte() {
        let block = decode_sensor_block(&sample_sensor_payload()).unwrap();
        assert!((block.temperature_celsius - 21.5).abs() < f64::EPSILON);
        assert_eq!(block.light_lux, 1000);
        assert_eq!(block.moisture_percent, 42);
        assert_eq!(block.conductivity_us_cm, 300);
    }

    #[test]
    fn should_ignore_padding_byte_value() {
        let mut data = sample_sensor_payload();
        data[2] = 0x00;
        let zeroed = decode_sensor_block(&data).unwrap();
        data[2] = 0x7E;
        let other = decode_sensor_block(&data).unwrap();
        assert_eq!(zeroed, other);
    }

    #[test]
    fn should_decode_identically_on_repeated_calls() {
        let data = sample_sensor_payload();
        assert_eq!(
            decode_sensor_block(&data).unwrap(),
            decode_sensor_block(&data).unwrap()
        );
    }

    #[test]
    fn should_ignore_trailing_bytes() {
        let mut data = [0u8; 16];
        data[..10].copy_from_slice(&sample_sensor_payload());
        data[10..].fill(0xAB);
        let block = decode_sensor_block(&data).unwrap();
        assert_eq!(block.light_lux, 1000);
        assert_eq!(block.conductivity_us_cm, 300);
    }

    #[test]
    fn should_decode_max_values() {
        let data = [0xFF; 10];
        let block = decode_sensor_block(&data).unwrap();
        assert!((block.temperature_celsius - 6553.5).abs() < 1e-9);
        assert_eq!(block.light_lux, u32::MAX);
        assert_eq!(block.moisture_percent, u8::MAX);
        assert_eq!(block.conductivity_us_cm, u16::MAX);
    }

    #[test]
    fn should_reject_nine_byte_sensor_block() {
        let err = decode_sensor_block(&[0u8; 9]).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::TooShort {
                expected: 10,
                actual: 9,
                ..
            }
        ));
    }

    #[test]
    fn should_accept_exactly_ten_bytes() {
        assert!(decode_sensor_block(&[0u8; 10]).is_ok());
    }

    // ── Battery block ───────────────────────────────────────────────────

    #[test]
    fn should_decode_battery_percent() {
        assert_eq!(decode_battery_block(&[0x64]).unwrap(), 100);
    }

    #[test]
    fn should_ignore_firmware_bytes_after_battery() {
        let data = [0x63, 0x13, b'3', b'.', b'1', b'.', b'8'];
        assert_eq!(decode_battery_block(&data).unwrap(), 99);
    }

    #[test]
    fn should_reject_empty_battery_block() {
        let err = decode_battery_block(&[]).unwrap_err();
        assert_eq!(err.to_string(), "battery block must be at least 1 bytes, got 0");
    }
}

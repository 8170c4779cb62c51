//! `MiBeacon` service data parser.
//!
//! Plant sensors broadcast `0xFE95` service data between connections. Each
//! frame carries at most one measurement event; the layout is driven by the
//! frame control flags:
//!
//! | Bytes | Field | Present when |
//! |-------|-------|--------------|
//! | 0–1 | Frame control (u16 LE, 4-bit version + 12-bit flags) | always |
//! | 2–3 | Product id (u16 LE, `0x0098` for HHCCJCY01) | always |
//! | 4 | Frame counter | always |
//! | next 6 | MAC, reversed | flag bit 4 |
//! | next 1 | Capabilities | flag bit 5 |
//! | next 2 + 1 + n | Event type (u16 LE), length, value | flag bit 6 |

use std::fmt;

use plant_collector_domain::address::DeviceAddress;

use crate::error::{BleError, PayloadParseError};

/// Service data UUID of `MiBeacon` frames.
pub(crate) const MIBEACON_SERVICE: uuid::Uuid =
    uuid::Uuid::from_u128(0x0000_fe95_0000_1000_8000_0080_5f9b_34fb);

const FLAG_ENCRYPTED: u16 = 1 << 3;
const FLAG_MAC: u16 = 1 << 4;
const FLAG_CAPABILITIES: u16 = 1 << 5;
const FLAG_EVENT: u16 = 1 << 6;

const HEADER_LEN: usize = 5;
const MAC_LEN: usize = 6;
const EVENT_HEADER_LEN: usize = 3;

/// One decoded `MiBeacon` frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MiBeaconFrame {
    pub version: u8,
    pub product_id: u16,
    pub counter: u8,
    /// Sender address, when the frame includes it.
    pub address: Option<DeviceAddress>,
    pub event: Option<MiBeaconEvent>,
}

/// Measurement carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MiBeaconEvent {
    /// °C
    Temperature(f64),
    /// %
    Humidity(f64),
    /// lux
    Light(u32),
    /// %
    Moisture(u8),
    /// µS/cm
    Conductivity(u16),
    /// %
    Battery(u8),
    /// An event type this parser does not decode.
    Other(u16),
}

impl MiBeaconEvent {
    fn decode(kind: u16, value: &[u8]) -> Result<Self, BleError> {
        let required = match kind {
            0x1004 | 0x1006 | 0x1009 => 2,
            0x1007 => 3,
            0x1008 | 0x100a => 1,
            _ => return Ok(Self::Other(kind)),
        };
        if value.len() < required {
            return Err(BleError::PayloadParse(PayloadParseError::EventTooShort {
                kind,
                expected: required,
                actual: value.len(),
            }));
        }

        Ok(match kind {
            0x1004 => Self::Temperature(f64::from(i16::from_le_bytes([value[0], value[1]])) / 10.0),
            0x1006 => Self::Humidity(f64::from(u16::from_le_bytes([value[0], value[1]])) / 10.0),
            0x1007 => Self::Light(u32::from_le_bytes([value[0], value[1], value[2], 0])),
            0x1008 => Self::Moisture(value[0]),
            0x1009 => Self::Conductivity(u16::from_le_bytes([value[0], value[1]])),
            _ => Self::Battery(value[0]),
        })
    }
}

impl fmt::Display for MiBeaconEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature(celsius) => write!(f, "temperature {celsius} °C"),
            Self::Humidity(percent) => write!(f, "humidity {percent} %"),
            Self::Light(lux) => write!(f, "light {lux} lux"),
            Self::Moisture(percent) => write!(f, "moisture {percent} %"),
            Self::Conductivity(us_cm) => write!(f, "conductivity {us_cm} µS/cm"),
            Self::Battery(percent) => write!(f, "battery {percent} %"),
            Self::Other(kind) => write!(f, "event {kind:#06x}"),
        }
    }
}

/// Parse a `0xFE95` service data payload.
///
/// # Errors
///
/// Returns [`BleError::PayloadParse`] when the frame is truncated, when its
/// event is encrypted, or when an event value is too short for its type.
pub(crate) fn parse_mibeacon(data: &[u8]) -> Result<MiBeaconFrame, BleError> {
    let header = field(data, 0, HEADER_LEN)?;
    let frame_control = u16::from_le_bytes([header[0], header[1]]);
    let flags = frame_control & 0x0fff;
    let mut offset = HEADER_LEN;

    let address = if flags & FLAG_MAC == 0 {
        None
    } else {
        let raw = field(data, offset, MAC_LEN)?;
        offset += MAC_LEN;
        Some(DeviceAddress::new(format!(
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            raw[5], raw[4], raw[3], raw[2], raw[1], raw[0]
        )))
    };

    if flags & FLAG_CAPABILITIES != 0 {
        field(data, offset, 1)?;
        offset += 1;
    }

    let event = if flags & FLAG_EVENT == 0 {
        None
    } else if flags & FLAG_ENCRYPTED != 0 {
        return Err(BleError::PayloadParse(PayloadParseError::Encrypted));
    } else {
        let head = field(data, offset, EVENT_HEADER_LEN)?;
        let kind = u16::from_le_bytes([head[0], head[1]]);
        let value = field(data, offset + EVENT_HEADER_LEN, usize::from(head[2]))?;
        Some(MiBeaconEvent::decode(kind, value)?)
    };

    Ok(MiBeaconFrame {
        version: header[1] >> 4,
        product_id: u16::from_le_bytes([header[2], header[3]]),
        counter: header[4],
        address,
        event,
    })
}

fn field(data: &[u8], offset: usize, len: usize) -> Result<&[u8], BleError> {
    data.get(offset..offset + len).ok_or_else(|| {
        BleError::PayloadParse(PayloadParseError::TooShort {
            expected: offset + len,
            actual: data.len(),
        })
    })
}

//! # plant-collector-adapter-ble
//!
//! BLE adapter — implements the radio ports on top of
//! [btleplug](https://docs.rs/btleplug).
//!
//! ## How it works
//!
//! - [`RadioScanner`](plant_collector_app::ports::RadioScanner): a timed
//!   scan on the first host adapter. Only peripherals that produced an event
//!   during the window are rendered as advertisement records (local name +
//!   service UUID list). `MiBeacon` service data broadcast by the sensors is
//!   decoded and logged, and its MAC stands in for platforms that hide the
//!   hardware address.
//! - [`RadioLink`](plant_collector_app::ports::RadioLink): connect and
//!   discover services, then write/read the Mi Flora characteristics. The
//!   protocol's attribute handles are mapped to GATT UUIDs:
//!
//! | Handle | UUID | Register |
//! |--------|------|----------|
//! | `0x0033` | `00001a00-…` | Command |
//! | `0x0035` | `00001a01-…` | Sensor data |
//! | `0x0038` | `00001a02-…` | Battery + firmware |
//!
//! Every radio operation is bounded by a timeout so a silent device cannot
//! stall a collection cycle.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `plant-collector-app` and
//! `plant-collector-domain`.

mod config;
mod error;
mod gatt;
mod mibeacon;
mod radio;

pub use config::BleConfig;
pub use error::BleError;
pub use radio::BtleRadio;

//! # plant-collector-domain
//!
//! Pure domain model for the plant sensor collector.
//!
//! ## Responsibilities
//! - Foundational types: device addresses, error conventions, timestamps
//! - Protocol constants for the plant sensor GATT exchange
//! - The **Binary Codec** that turns raw characteristic payloads into readings
//! - Value objects handed between the collection services and the reporter
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod address;
pub mod error;
pub mod time;

pub mod advertisement;
pub mod codec;
pub mod collection;
pub mod measurement;
pub mod protocol;
pub mod reading;

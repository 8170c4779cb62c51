//! # plant-collector-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RadioScanner` — timed advertisement scan
//!   - `RadioLink` — connect / write / read / disconnect by device handle
//!   - `Reporter` — deliver a measurement to the ingestion endpoint
//! - Define the **use-cases**:
//!   - `Discovery` — scan and keep devices advertising the plant sensor service
//!   - `DeviceSession` — the five-step exchange with a single device
//!   - `CollectionCycle` — one discovery-then-poll-all pass
//!   - `CollectionLoop` — repeat cycles on a fixed interval until shutdown
//!
//! ## Dependency rule
//! Depends on `plant-collector-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

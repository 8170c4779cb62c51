//! # plant-collector-adapter-ingester
//!
//! Implements the [`Reporter`](plant_collector_app::ports::Reporter) port by
//! POSTing each measurement as JSON to the ingestion endpoint.
//!
//! The endpoint acknowledges a measurement with `204 No Content`; any other
//! status is a delivery failure. Requests are bounded by a timeout and never
//! retried.

mod config;
mod error;
mod ingester;

pub use config::IngesterConfig;
pub use error::IngesterError;
pub use ingester::HttpIngester;

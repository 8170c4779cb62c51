//! Application services — use-case orchestration.

pub mod collection_cycle;
pub mod collection_loop;
pub mod device_session;
pub mod discovery;

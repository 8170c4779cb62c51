//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for measurement capture times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp as ISO-8601 UTC with microseconds and a trailing `Z`
/// (e.g. `2024-05-01T12:30:00.123456Z`).
#[must_use]
pub fn format_iso8601(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

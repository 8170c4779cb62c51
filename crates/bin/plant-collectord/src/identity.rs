//! Collector identity — the hardware address stamped on every measurement.

use mac_address::MacAddressError;

/// Failure to determine the collector address.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Interface enumeration failed.
    #[error("failed to look up host hardware address")]
    Lookup(#[from] MacAddressError),
    /// No interface with a hardware address was found.
    #[error("no network interface with a hardware address; set COLLECTOR_MAC")]
    NotFound,
}

/// Use the configured address when present, otherwise the first hardware
/// address reported by the host.
///
/// # Errors
///
/// Returns [`IdentityError`] when nothing is configured and the host has no
/// usable interface.
pub fn resolve_collector_mac(configured: Option<&str>) -> Result<String, IdentityError> {
    if let Some(mac) = configured.map(str::trim).filter(|mac| !mac.is_empty()) {
        return Ok(mac.to_string());
    }

    let mac = mac_address::get_mac_address()?.ok_or(IdentityError::NotFound)?;
    Ok(mac.to_string().to_lowercase())
}

//! Advertisement records collected during a discovery scan.

use crate::address::DeviceAddress;
use crate::protocol::{SERVICE_SIGNATURE, SERVICE_UUIDS_AD_TYPE};

/// One advertisement data entry: its AD type and rendered value.
///
/// Service UUID entries are rendered as lowercase hyphenated UUID strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisementData {
    /// Advertisement data type byte.
    pub ad_type: u8,
    /// Rendered value.
    pub value: String,
}

impl AdvertisementData {
    /// Build an entry.
    #[must_use]
    pub fn new(ad_type: u8, value: impl Into<String>) -> Self {
        Self {
            ad_type,
            value: value.into(),
        }
    }

    /// Whether this entry advertises the plant sensor service.
    ///
    /// The value comparison is exact and case-sensitive.
    #[must_use]
    pub fn is_service_signature(&self) -> bool {
        self.ad_type == SERVICE_UUIDS_AD_TYPE && self.value == SERVICE_SIGNATURE
    }
}

/// Everything observed from one device during a scan window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Address of the advertising device.
    pub address: DeviceAddress,
    /// Advertisement data entries.
    pub data: Vec<AdvertisementData>,
}

impl Advertisement {
    /// Whether any entry carries the plant sensor service signature.
    #[must_use]
    pub fn advertises_signature(&self) -> bool {
        self.data.iter().any(AdvertisementData::is_service_signature)
    }
}

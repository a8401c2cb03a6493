use serde::{Deserialize, Serialize};

use super::ZoneConfig;

/// Derived configuration for one receiver, the unit of cache persistence
///
/// Zone 1 is always present; zones 2-4 exist only when the receiver
/// reported the matching feature flag at creation time. The input topology
/// inside each zone is fixed when the config is created and never
/// regenerated on later runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Address the device was configured with when first identified
    pub ip: String,
    /// Stable device identifier, unique across the cache
    pub id: String,
    pub model: String,
    pub zone1: ZoneConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone2: Option<ZoneConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone3: Option<ZoneConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone4: Option<ZoneConfig>,
}

impl DeviceConfig {
    /// Look up a zone by index (1-4).
    pub fn zone(&self, zone: u8) -> Option<&ZoneConfig> {
        match zone {
            1 => Some(&self.zone1),
            2 => self.zone2.as_ref(),
            3 => self.zone3.as_ref(),
            4 => self.zone4.as_ref(),
            _ => None,
        }
    }

    /// Mutable zone lookup (1-4).
    pub fn zone_mut(&mut self, zone: u8) -> Option<&mut ZoneConfig> {
        match zone {
            1 => Some(&mut self.zone1),
            2 => self.zone2.as_mut(),
            3 => self.zone3.as_mut(),
            4 => self.zone4.as_mut(),
            _ => None,
        }
    }

    pub(crate) fn set_zone(&mut self, zone: u8, config: ZoneConfig) {
        match zone {
            2 => self.zone2 = Some(config),
            3 => self.zone3 = Some(config),
            4 => self.zone4 = Some(config),
            _ => {}
        }
    }
}

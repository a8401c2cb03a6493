use serde::{Deserialize, Serialize};

use super::MappedInput;

/// Volume accessory configuration for a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpec {
    /// Accessory name, e.g. "Living Room Volume"
    pub name: String,
    /// Accessory type the host should expose ("bulb", "fan", ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Derived configuration for a single receiver zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneConfig {
    /// Whether the user enabled this zone; only meaningful for zones 2-4,
    /// absent for the main zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub name: String,
    pub inputs: Vec<MappedInput>,
    /// Lower volume bound in dB
    pub min_volume: f32,
    /// Upper volume bound in dB
    pub max_volume: f32,
    pub volume: VolumeSpec,
}

impl ZoneConfig {
    /// Zones are inactive until explicitly enabled.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }
}

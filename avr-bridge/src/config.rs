//! Platform configuration as supplied by the accessory-bridge host.
//!
//! Field names follow the host's JSON config schema (camelCase), which is
//! why every user-facing knob is optional: the host hands over whatever the
//! user wrote, and defaults are applied downstream.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Top-level plugin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformConfig {
    /// Platform display name
    pub name: Option<String>,
    /// Receivers to manage, in registration order
    pub receivers: Vec<ReceiverDescriptor>,
}

impl PlatformConfig {
    /// Parse a platform configuration from the host's JSON config blob.
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-receiver user configuration
///
/// Read once at startup and never mutated. Everything except `ip` is an
/// override on top of what the receiver itself reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiverDescriptor {
    /// IPv4 address of the receiver; entries without one are skipped
    pub ip: Option<String>,
    /// Display name override; defaults to "Yamaha {model}"
    pub name: Option<String>,
    /// Main zone minimum volume in dB (default -80)
    pub min_volume: Option<f32>,
    /// Main zone maximum volume in dB (default -10)
    pub max_volume: Option<f32>,
    /// Accessory type used to expose volume control (e.g. "bulb", "fan")
    pub volume_accessory: Option<String>,
    pub enable_zone2: Option<bool>,
    pub enable_zone3: Option<bool>,
    pub enable_zone4: Option<bool>,
    pub zone2_min_volume: Option<f32>,
    pub zone2_max_volume: Option<f32>,
    pub zone3_min_volume: Option<f32>,
    pub zone3_max_volume: Option<f32>,
    pub zone4_min_volume: Option<f32>,
    pub zone4_max_volume: Option<f32>,
}

impl ReceiverDescriptor {
    /// User's enable flag for an extra zone, `None` when not configured.
    pub fn enable_zone(&self, zone: u8) -> Option<bool> {
        match zone {
            2 => self.enable_zone2,
            3 => self.enable_zone3,
            4 => self.enable_zone4,
            _ => None,
        }
    }

    /// Minimum volume override for an extra zone.
    pub fn zone_min_volume(&self, zone: u8) -> Option<f32> {
        match zone {
            2 => self.zone2_min_volume,
            3 => self.zone3_min_volume,
            4 => self.zone4_min_volume,
            _ => None,
        }
    }

    /// Maximum volume override for an extra zone.
    pub fn zone_max_volume(&self, zone: u8) -> Option<f32> {
        match zone {
            2 => self.zone2_max_volume,
            3 => self.zone3_max_volume,
            4 => self.zone4_max_volume,
            _ => None,
        }
    }

    /// Display name for the receiver, falling back to the reported model.
    pub fn display_name(&self, model: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Yamaha {}", model))
    }
}

//! Zone config synthesis and cache merging.
//!
//! A `DeviceConfig` is created once, on the first run that successfully
//! identifies a receiver, and lives in the cache from then on. Later runs
//! only overlay the dynamic, user-supplied fields; the input topology is
//! fixed at creation time.

use tracing::debug;

use avr_client::SystemConfig;

use crate::config::ReceiverDescriptor;
use crate::inputs::map_inputs;
use crate::model::{DeviceConfig, InputDescriptor, VolumeSpec, ZoneConfig};

pub(crate) const DEFAULT_MIN_VOLUME: f32 = -80.0;
pub(crate) const DEFAULT_MAX_VOLUME: f32 = -10.0;
pub(crate) const EXTRA_ZONES: [u8; 3] = [2, 3, 4];

impl DeviceConfig {
    /// Synthesize a configuration for a newly identified receiver.
    ///
    /// Zone 1 is always built; zones 2-4 only when the receiver reports the
    /// matching `Zone_<i>` feature flag as `"1"`. Extra zones start out
    /// inactive unless the user enabled them explicitly.
    pub fn create(
        rx: &ReceiverDescriptor,
        live: &SystemConfig,
        available: &[InputDescriptor],
    ) -> Self {
        let name = rx.display_name(&live.model);

        let mut config = DeviceConfig {
            ip: rx.ip.clone().unwrap_or_default(),
            id: live.id.clone(),
            model: live.model.clone(),
            zone1: ZoneConfig {
                active: None,
                name: name.clone(),
                inputs: map_inputs(available, false),
                min_volume: rx.min_volume.unwrap_or(DEFAULT_MIN_VOLUME),
                max_volume: rx.max_volume.unwrap_or(DEFAULT_MAX_VOLUME),
                volume: VolumeSpec {
                    name: format!("{} Volume", name),
                    kind: rx.volume_accessory.clone(),
                },
            },
            zone2: None,
            zone3: None,
            zone4: None,
        };

        for i in EXTRA_ZONES {
            let flag = live.features.get(&format!("Zone_{}", i));
            if flag.map(String::as_str) != Some("1") {
                continue;
            }
            debug!(zone = i, "zone available");
            config.set_zone(
                i,
                ZoneConfig {
                    active: rx.enable_zone(i),
                    name: format!("{} Zone{}", name, i),
                    inputs: map_inputs(available, true),
                    min_volume: rx.zone_min_volume(i).unwrap_or(DEFAULT_MIN_VOLUME),
                    max_volume: rx.zone_max_volume(i).unwrap_or(DEFAULT_MAX_VOLUME),
                    volume: VolumeSpec {
                        name: format!("{} Zone{} Volume", name, i),
                        kind: rx.volume_accessory.clone(),
                    },
                },
            );
        }

        config
    }

    /// Produce a copy of this cached config with the dynamic, user-supplied
    /// fields overlaid.
    ///
    /// Names and input tables are kept verbatim. Extra zones inherit the
    /// main zone's merged volume bounds unless they carry their own
    /// overrides. The cached `ip` is kept even when the receiver is now
    /// configured under a different address; matching happened by `id`, and
    /// the stored address reflects where the device was first identified.
    pub fn merged_with(&self, rx: &ReceiverDescriptor) -> Self {
        let mut merged = self.clone();

        merged.zone1.volume.kind = rx.volume_accessory.clone();
        merged.zone1.min_volume = rx.min_volume.unwrap_or(DEFAULT_MIN_VOLUME);
        merged.zone1.max_volume = rx.max_volume.unwrap_or(DEFAULT_MAX_VOLUME);

        let zone1_min = merged.zone1.min_volume;
        let zone1_max = merged.zone1.max_volume;

        for i in EXTRA_ZONES {
            if let Some(zone) = merged.zone_mut(i) {
                zone.active = rx.enable_zone(i);
                zone.min_volume = rx.zone_min_volume(i).unwrap_or(zone1_min);
                zone.max_volume = rx.zone_max_volume(i).unwrap_or(zone1_max);
                zone.volume.kind = rx.volume_accessory.clone();
            }
        }

        merged
    }
}

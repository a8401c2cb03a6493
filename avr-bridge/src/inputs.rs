//! Input derivation: key normalization, enumeration and mapping.
//!
//! Receivers report inputs under vendor-internal keys (`HDMI_1`,
//! `NET_RADIO`) and advertise additional sources only through feature
//! flags. These functions turn that raw material into the indexed input
//! table a zone accessory exposes.

use avr_client::SystemConfig;

use crate::model::{InputDescriptor, MappedInput};

/// Synthetic input that mirrors the main zone's current source.
pub const MAIN_ZONE_SYNC: &str = "Main Zone Sync";

/// Map a vendor-internal input or feature key to a display-friendly,
/// stable key.
///
/// A handful of keys have fixed translations; everything else has only its
/// FIRST underscore removed (`HDMI_1` becomes `HDMI1`, but `A_B_C` keeps
/// the second underscore).
pub fn normalize_key(raw: &str) -> String {
    match raw {
        "NET_RADIO" => "NET RADIO".to_string(),
        "MusicCast_Link" => "MusicCast Link".to_string(),
        "V_AUX" => "V-AUX".to_string(),
        "Tuner" => "TUNER".to_string(),
        _ => raw.replacen('_', "", 1),
    }
}

/// Derive the list of available inputs from a receiver's system config.
///
/// Direct inputs come first, in the order the receiver declared them.
/// Feature flags set to `"1"` contribute additional entries unless an input
/// with the same normalized key already exists; zone flags (raw key contains
/// `"one"`) and USB (already in the input list) are skipped. Features carry
/// no display name, so the normalized key doubles as one.
pub fn enumerate_inputs(config: &SystemConfig) -> Vec<InputDescriptor> {
    let mut available: Vec<InputDescriptor> = config
        .inputs
        .iter()
        .map(|(key, name)| InputDescriptor {
            key: normalize_key(key),
            name: name.clone(),
        })
        .collect();

    for (key, flag) in &config.features {
        let normalized = normalize_key(key);
        let exists = available.iter().any(|input| input.key == normalized);
        if !exists && !key.contains("one") && !key.contains("USB") && flag == "1" {
            available.push(InputDescriptor {
                name: normalized.clone(),
                key: normalized,
            });
        }
    }

    available
}

/// Build the accessory-facing input table for a zone.
///
/// Identifiers are dense 0-based positions. The zone-specific variant
/// prepends a synthetic "Main Zone Sync" entry carrying the pre-insert list
/// length as its identifier, then drops HDMI inputs; identifiers are NOT
/// renumbered after the filter, so a zone's table may be non-contiguous.
/// The accessory layer treats identifiers as stable selector references,
/// which is why the gaps (and the sync entry's odd identifier) must stay.
pub fn map_inputs(inputs: &[InputDescriptor], zone_specific: bool) -> Vec<MappedInput> {
    let mut mapped: Vec<MappedInput> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| MappedInput {
            identifier: i as u32,
            name: input.name.clone(),
            key: input.key.clone(),
            hidden: false,
        })
        .collect();

    if zone_specific {
        mapped.insert(
            0,
            MappedInput {
                identifier: mapped.len() as u32,
                name: MAIN_ZONE_SYNC.to_string(),
                key: MAIN_ZONE_SYNC.to_string(),
                hidden: false,
            },
        );
        mapped.retain(|input| !input.key.to_lowercase().contains("hdmi"));
    }

    mapped
}

use serde::{Deserialize, Serialize};

/// An input available on a receiver, with its vendor key normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    /// Normalized input key, e.g. "HDMI1", "NET RADIO"
    pub key: String,
    /// Display name reported by the receiver
    pub name: String,
}

/// An input entry in a zone's accessory-facing input table
///
/// `identifier` is the selector position the accessory layer refers to.
/// It reflects the position the entry had when the table was built and is
/// deliberately never renumbered afterwards, so identifiers stay stable
/// references even when entries are filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedInput {
    pub identifier: u32,
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub hidden: bool,
}

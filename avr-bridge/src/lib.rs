//! # AVR Bridge - Yamaha receivers as smart-home accessories
//!
//! Exposes Yamaha AV receivers (and their zones) as switch/receiver
//! accessories for an accessory-bridge host. On startup the platform runs
//! one reconciliation pass per configured receiver:
//!
//! ```text
//! configured receivers
//!     ↓ live system-config query (avr-client)
//! Platform (reconciler)
//!     ↓ cache hit: overlay dynamic fields │ cache miss: derive zone configs
//! persisted cache (avr-store)
//!     ↓
//! AccessoryRegistrar (per zone + party mode switch)
//! ```
//!
//! ```rust,no_run
//! use avr_bridge::{Platform, PlatformConfig, YncClientFactory};
//! use avr_bridge::{PersistStore, StoreOptions};
//!
//! # struct HostRegistrar;
//! # impl avr_bridge::AccessoryRegistrar<avr_bridge::YamahaClient> for HostRegistrar {
//! #     fn register_receiver(&mut self, _: avr_bridge::YamahaClient, _: avr_bridge::ZoneAccessory) {}
//! #     fn register_party_switch(&mut self, _: avr_bridge::PartySwitch<avr_bridge::YamahaClient>) {}
//! # }
//! # fn main() -> Result<(), avr_bridge::BridgeError> {
//! let config = PlatformConfig::from_json(r#"{"receivers": [{"ip": "192.168.1.50"}]}"#)?;
//! let store = PersistStore::init(StoreOptions {
//!     dir: "/var/lib/avr-bridge".into(),
//!     forgive_parse_errors: true,
//! })?;
//!
//! let mut platform = Platform::new(config, store, YncClientFactory, HostRegistrar);
//! platform.init()?;
//! # Ok(())
//! # }
//! ```
//!
//! Derived device configurations are cached to disk, so later startups do
//! not re-derive input tables even when a receiver is unreachable.

// Main exports
pub use config::{PlatformConfig, ReceiverDescriptor};
pub use error::BridgeError;
pub use inputs::{enumerate_inputs, map_inputs, normalize_key, MAIN_ZONE_SYNC};
pub use model::{DeviceConfig, InputDescriptor, MappedInput, VolumeSpec, ZoneConfig};
pub use party::PartySwitch;
pub use reconciler::Platform;
pub use registrar::{
    AccessoryInformation, AccessoryRegistrar, ClientFactory, ReceiverClient, YncClientFactory,
    ZoneAccessory,
};

// Re-export the capability crates' surface the host needs
pub use avr_client::{ClientError, SystemConfig, YamahaClient};
pub use avr_store::{PersistStore, StoreError, StoreOptions};

// Internal modules
mod config;
mod error;
mod inputs;
mod model;
mod party;
mod reconciler;
mod registrar;
mod synth;

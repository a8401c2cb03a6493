//! Capability seams between the reconciler and its collaborators.
//!
//! The reconciler never talks to the network or the accessory host
//! directly; it goes through these traits so both can be injected (and
//! mocked in tests). `YamahaClient` from `avr-client` is the production
//! `ReceiverClient`.

use avr_client::{ClientError, SystemConfig, YamahaClient};

use crate::model::{DeviceConfig, MappedInput, VolumeSpec};
use crate::party::PartySwitch;

/// Control surface the core needs from a receiver
pub trait ReceiverClient {
    fn get_system_config(&self) -> Result<SystemConfig, ClientError>;
    fn is_party_mode_enabled(&self) -> Result<bool, ClientError>;
    fn power_on(&self) -> Result<(), ClientError>;
    fn party_mode_on(&self) -> Result<(), ClientError>;
    fn party_mode_off(&self) -> Result<(), ClientError>;
}

impl ReceiverClient for YamahaClient {
    fn get_system_config(&self) -> Result<SystemConfig, ClientError> {
        YamahaClient::get_system_config(self)
    }

    fn is_party_mode_enabled(&self) -> Result<bool, ClientError> {
        YamahaClient::is_party_mode_enabled(self)
    }

    fn power_on(&self) -> Result<(), ClientError> {
        YamahaClient::power_on(self)
    }

    fn party_mode_on(&self) -> Result<(), ClientError> {
        YamahaClient::party_mode_on(self)
    }

    fn party_mode_off(&self) -> Result<(), ClientError> {
        YamahaClient::party_mode_off(self)
    }
}

/// Produces a client for each configured receiver address
pub trait ClientFactory {
    type Client: ReceiverClient + Clone;

    fn client_for(&self, ip: &str) -> Self::Client;
}

/// Production factory creating YNC clients
#[derive(Debug, Clone, Default)]
pub struct YncClientFactory;

impl ClientFactory for YncClientFactory {
    type Client = YamahaClient;

    fn client_for(&self, ip: &str) -> YamahaClient {
        YamahaClient::new(ip)
    }
}

/// Static accessory metadata published alongside a switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl AccessoryInformation {
    pub fn for_device(device: &DeviceConfig) -> Self {
        Self {
            manufacturer: "Yamaha".to_string(),
            model: device.model.clone(),
            serial_number: device.id.clone(),
        }
    }
}

/// Flattened per-zone payload handed to the accessory host
///
/// Everything a receiver accessory needs, denormalized from the device
/// config so the host does not have to know the cache layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneAccessory {
    pub ip: String,
    pub id: String,
    /// Main zone display name, used to group zones of one receiver
    pub avr_name: String,
    pub name: String,
    pub zone: u8,
    pub model: String,
    pub inputs: Vec<MappedInput>,
    pub volume: VolumeSpec,
    pub min_volume: f32,
    pub max_volume: f32,
    pub party_switch_enabled: bool,
}

impl ZoneAccessory {
    /// Build the registration payload for one zone of a device.
    ///
    /// Returns `None` when the device has no such zone.
    pub fn for_zone(device: &DeviceConfig, zone: u8) -> Option<Self> {
        let zone_config = device.zone(zone)?;
        Some(Self {
            ip: device.ip.clone(),
            id: device.id.clone(),
            avr_name: device.zone1.name.clone(),
            name: zone_config.name.clone(),
            zone,
            model: device.model.clone(),
            inputs: zone_config.inputs.clone(),
            volume: zone_config.volume.clone(),
            min_volume: zone_config.min_volume,
            max_volume: zone_config.max_volume,
            party_switch_enabled: true,
        })
    }
}

/// Sink for finished accessory configurations
///
/// Implementations must derive accessory identity deterministically from
/// the device `id` and zone index so accessories stay stable across
/// restarts.
pub trait AccessoryRegistrar<C: ReceiverClient> {
    /// Register a receiver accessory for one zone.
    fn register_receiver(&mut self, client: C, accessory: ZoneAccessory);

    /// Register the party mode toggle for a receiver's main zone.
    fn register_party_switch(&mut self, switch: PartySwitch<C>);
}

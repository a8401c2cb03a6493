//! Per-receiver reconciliation.
//!
//! One pass over the configured receivers: query live state, merge with the
//! cached config or synthesize a new one, register accessories, and persist
//! the reconciled cache. A single receiver failing never aborts the pass;
//! it is logged and skipped for this run.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use avr_store::PersistStore;

use crate::config::{PlatformConfig, ReceiverDescriptor};
use crate::error::BridgeError;
use crate::inputs::enumerate_inputs;
use crate::model::DeviceConfig;
use crate::party::PartySwitch;
use crate::registrar::{AccessoryInformation, AccessoryRegistrar, ClientFactory, ReceiverClient, ZoneAccessory};
use crate::synth::EXTRA_ZONES;

const CACHED_DEVICES_KEY: &str = "cachedDevices";
const CACHED_STATES_KEY: &str = "cachedStates";

fn ipv4_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Same shape check the original plugin config used; octet range is
    // deliberately not validated
    PATTERN.get_or_init(|| Regex::new(r"^(?:\d{1,3}\.){3}\d{1,3}$").expect("static IPv4 pattern"))
}

pub(crate) fn is_valid_ipv4(ip: &str) -> bool {
    ipv4_pattern().is_match(ip)
}

/// The platform: owns the cache and drives one reconciliation pass per
/// startup
///
/// Collaborators are constructor-injected: a `ClientFactory` for receiver
/// connections and an `AccessoryRegistrar` as the sink for finished zone
/// configs.
pub struct Platform<F, R> {
    config: PlatformConfig,
    store: PersistStore,
    clients: F,
    registrar: R,
    cached_devices: Vec<DeviceConfig>,
    cached_states: serde_json::Value,
}

impl<F, R> Platform<F, R>
where
    F: ClientFactory,
    R: AccessoryRegistrar<F::Client>,
{
    pub fn new(config: PlatformConfig, store: PersistStore, clients: F, registrar: R) -> Self {
        Self {
            config,
            store,
            clients,
            registrar,
            cached_devices: Vec::new(),
            cached_states: serde_json::Value::Object(Default::default()),
        }
    }

    /// Run the startup pass: load the cache, reconcile every configured
    /// receiver, register accessories, and persist the updated cache.
    ///
    /// Only storage failures propagate; per-receiver problems are logged
    /// and isolated.
    pub fn init(&mut self) -> Result<(), BridgeError> {
        self.cached_devices = self
            .store
            .get_item(CACHED_DEVICES_KEY)?
            .unwrap_or_default();
        self.cached_states = self
            .store
            .get_item(CACHED_STATES_KEY)?
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        // Drop cache entries for receivers removed from the configuration
        let receivers = &self.config.receivers;
        self.cached_devices
            .retain(|device| receivers.iter().any(|rx| rx.ip.as_deref() == Some(device.ip.as_str())));

        let receivers = self.config.receivers.clone();
        for rx in &receivers {
            self.process_receiver(rx);
        }

        self.store.set_item(CACHED_DEVICES_KEY, &self.cached_devices)?;
        Ok(())
    }

    fn process_receiver(&mut self, rx: &ReceiverDescriptor) {
        let Some(ip) = rx.ip.as_deref() else {
            return;
        };
        if !is_valid_ipv4(ip) {
            warn!(%ip, "not a valid IPv4 address, skipping device");
            return;
        }

        let client = self.clients.client_for(ip);

        let live = match client.get_system_config() {
            Ok(config) => {
                info!(%ip, "found AVR \"Yamaha {}\"", config.model);
                Some(config)
            }
            Err(err) => {
                warn!(%ip, error = %err, "could not detect receiver, control may not work");
                None
            }
        };

        // Match by stable id when we have one, fall back to the configured
        // address for devices never successfully identified
        let slot = self.cached_devices.iter().position(|device| {
            live.as_ref().map_or(false, |l| device.id == l.id) || device.ip == ip
        });

        let device = match slot {
            Some(index) => {
                let merged = self.cached_devices[index].merged_with(rx);
                self.cached_devices[index] = merged.clone();
                merged
            }
            None => {
                let Some(live) = live.as_ref() else {
                    warn!(%ip, "can't create accessory for undetected device, skipping");
                    return;
                };
                let available = enumerate_inputs(live);
                debug!(?available, "available inputs");
                let created = DeviceConfig::create(rx, live, &available);
                self.cached_devices.push(created.clone());
                created
            }
        };

        debug!(device = ?device, "full device config");
        self.register_accessories(client, &device);
    }

    fn register_accessories(&mut self, client: F::Client, device: &DeviceConfig) {
        if let Some(main) = ZoneAccessory::for_zone(device, 1) {
            self.registrar.register_receiver(client.clone(), main);
        }

        debug!("party mode switch enabled for {}", device.zone1.name);
        self.registrar.register_party_switch(PartySwitch::new(
            client.clone(),
            AccessoryInformation::for_device(device),
        ));

        for i in EXTRA_ZONES {
            let Some(zone) = device.zone(i) else { continue };
            if zone.is_active() {
                debug!(zone = i, "adding zone for {}", device.zone1.name);
                if let Some(accessory) = ZoneAccessory::for_zone(device, i) {
                    self.registrar.register_receiver(client.clone(), accessory);
                }
            }
        }
    }

    /// Reconciled device configs from the last pass.
    pub fn devices(&self) -> &[DeviceConfig] {
        &self.cached_devices
    }

    /// Free-form per-accessory state loaded alongside the device cache.
    pub fn cached_states(&self) -> &serde_json::Value {
        &self.cached_states
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    pub fn into_registrar(self) -> R {
        self.registrar
    }
}

//! End-to-end reconciliation tests against a mock receiver network and a
//! recording accessory registrar.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use avr_bridge::{
    AccessoryRegistrar, ClientError, ClientFactory, DeviceConfig, PartySwitch, Platform,
    PlatformConfig, ReceiverClient, ReceiverDescriptor, SystemConfig, ZoneAccessory,
};
use avr_store::{PersistStore, StoreOptions};

// ==================== test doubles ====================

#[derive(Clone)]
struct MockClient {
    config: Option<SystemConfig>,
}

impl ReceiverClient for MockClient {
    fn get_system_config(&self) -> Result<SystemConfig, ClientError> {
        self.config
            .clone()
            .ok_or_else(|| ClientError::Network("connection refused".to_string()))
    }

    fn is_party_mode_enabled(&self) -> Result<bool, ClientError> {
        Ok(false)
    }

    fn power_on(&self) -> Result<(), ClientError> {
        Ok(())
    }

    fn party_mode_on(&self) -> Result<(), ClientError> {
        Ok(())
    }

    fn party_mode_off(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

/// Hands out a canned system config per IP; unknown IPs get an unreachable
/// client.
#[derive(Default)]
struct MockNetwork {
    devices: HashMap<String, SystemConfig>,
}

impl MockNetwork {
    fn with_device(mut self, ip: &str, config: SystemConfig) -> Self {
        self.devices.insert(ip.to_string(), config);
        self
    }
}

impl ClientFactory for MockNetwork {
    type Client = MockClient;

    fn client_for(&self, ip: &str) -> MockClient {
        MockClient {
            config: self.devices.get(ip).cloned(),
        }
    }
}

#[derive(Default)]
struct RecordingRegistrar {
    receivers: Vec<ZoneAccessory>,
    party_serials: Vec<String>,
}

impl AccessoryRegistrar<MockClient> for RecordingRegistrar {
    fn register_receiver(&mut self, _client: MockClient, accessory: ZoneAccessory) {
        self.receivers.push(accessory);
    }

    fn register_party_switch(&mut self, switch: PartySwitch<MockClient>) {
        self.party_serials.push(switch.info().serial_number.clone());
    }
}

// ==================== helpers ====================

fn create_system_config(id: &str, zones: &[u8], inputs: &[(&str, &str)]) -> SystemConfig {
    let mut features: IndexMap<String, String> = IndexMap::new();
    features.insert("Main_Zone".to_string(), "1".to_string());
    for i in zones {
        features.insert(format!("Zone_{}", i), "1".to_string());
    }

    SystemConfig {
        id: id.to_string(),
        model: "RX-V675".to_string(),
        features,
        inputs: inputs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn create_store(dir: &Path) -> PersistStore {
    PersistStore::init(StoreOptions {
        dir: dir.to_path_buf(),
        forgive_parse_errors: true,
    })
    .unwrap()
}

fn receiver(ip: &str) -> ReceiverDescriptor {
    ReceiverDescriptor {
        ip: Some(ip.to_string()),
        ..Default::default()
    }
}

fn platform_config(receivers: Vec<ReceiverDescriptor>) -> PlatformConfig {
    PlatformConfig {
        name: Some("YamahaAVR".to_string()),
        receivers,
    }
}

fn run_pass(
    dir: &Path,
    config: PlatformConfig,
    network: MockNetwork,
) -> (Vec<DeviceConfig>, RecordingRegistrar) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut platform = Platform::new(
        config,
        create_store(dir),
        network,
        RecordingRegistrar::default(),
    );
    platform.init().unwrap();
    let devices = platform.devices().to_vec();
    (devices, platform.into_registrar())
}

// ==================== scenarios ====================

#[test]
fn first_run_creates_config_and_registers_main_zone_only() {
    let dir = tempfile::tempdir().unwrap();
    let network = MockNetwork::default().with_device(
        "192.168.1.50",
        create_system_config("RX1", &[2], &[("HDMI_1", "TV")]),
    );

    let (devices, registrar) = run_pass(
        dir.path(),
        platform_config(vec![receiver("192.168.1.50")]),
        network,
    );

    assert_eq!(devices.len(), 1);
    let device = &devices[0];
    assert_eq!(device.id, "RX1");
    assert_eq!(device.ip, "192.168.1.50");
    assert!(device.zone2.is_some());
    // Zone 2 exists but is inactive until the user enables it
    assert!(!device.zone2.as_ref().unwrap().is_active());

    // Only the main zone receiver and the party switch are registered
    assert_eq!(registrar.receivers.len(), 1);
    assert_eq!(registrar.receivers[0].zone, 1);
    assert_eq!(registrar.party_serials, vec!["RX1".to_string()]);

    // Cache was persisted
    assert!(dir.path().join("cachedDevices.json").exists());
}

#[test]
fn second_run_yields_identical_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = platform_config(vec![receiver("192.168.1.50")]);
    let system = create_system_config("RX1", &[2], &[("HDMI_1", "TV"), ("AV_1", "AV1")]);

    run_pass(
        dir.path(),
        config.clone(),
        MockNetwork::default().with_device("192.168.1.50", system.clone()),
    );
    let first = fs::read_to_string(dir.path().join("cachedDevices.json")).unwrap();

    run_pass(
        dir.path(),
        config,
        MockNetwork::default().with_device("192.168.1.50", system),
    );
    let second = fs::read_to_string(dir.path().join("cachedDevices.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn cache_hit_merges_without_regenerating_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let system = create_system_config("RX1", &[2], &[("HDMI_1", "TV")]);

    let (first_devices, _) = run_pass(
        dir.path(),
        platform_config(vec![receiver("192.168.1.50")]),
        MockNetwork::default().with_device("192.168.1.50", system),
    );

    // Second run: the receiver now reports different inputs, and the user
    // configured overrides
    let changed = create_system_config("RX1", &[2], &[("AUDIO_1", "Phono")]);
    let rx = ReceiverDescriptor {
        ip: Some("192.168.1.50".to_string()),
        min_volume: Some(-60.0),
        enable_zone2: Some(true),
        ..Default::default()
    };
    let (devices, registrar) = run_pass(
        dir.path(),
        platform_config(vec![rx]),
        MockNetwork::default().with_device("192.168.1.50", changed),
    );

    let device = &devices[0];
    // Input topology is fixed at creation time
    assert_eq!(device.zone1.inputs, first_devices[0].zone1.inputs);
    // Dynamic fields were overlaid
    assert_eq!(device.zone1.min_volume, -60.0);
    let zone2 = device.zone2.as_ref().unwrap();
    assert_eq!(zone2.active, Some(true));
    assert_eq!(zone2.min_volume, -60.0);

    // Active zone 2 now gets its own receiver accessory
    let zones: Vec<u8> = registrar.receivers.iter().map(|a| a.zone).collect();
    assert_eq!(zones, vec![1, 2]);
}

#[test]
fn match_by_id_preserves_cached_ip() {
    let dir = tempfile::tempdir().unwrap();
    let config = platform_config(vec![receiver("192.168.1.50"), receiver("192.168.1.60")]);

    // First pass identifies the device at .60
    run_pass(
        dir.path(),
        config.clone(),
        MockNetwork::default()
            .with_device("192.168.1.60", create_system_config("RX1", &[], &[("AV_1", "AV1")])),
    );

    // The device moved to .50; it matches the cache slot by id
    let (devices, _) = run_pass(
        dir.path(),
        config,
        MockNetwork::default()
            .with_device("192.168.1.50", create_system_config("RX1", &[], &[("AV_1", "AV1")])),
    );

    assert_eq!(devices.len(), 1);
    // Cached address is preserved; matching happened by id
    assert_eq!(devices[0].ip, "192.168.1.60");
}

#[test]
fn unreachable_receiver_with_cache_entry_still_registers() {
    let dir = tempfile::tempdir().unwrap();
    let config = platform_config(vec![receiver("192.168.1.50")]);

    run_pass(
        dir.path(),
        config.clone(),
        MockNetwork::default()
            .with_device("192.168.1.50", create_system_config("RX1", &[], &[("AV_1", "AV1")])),
    );

    // Receiver is now offline; the cached config keeps the accessories up
    let (devices, registrar) = run_pass(dir.path(), config, MockNetwork::default());

    assert_eq!(devices.len(), 1);
    assert_eq!(registrar.receivers.len(), 1);
    assert_eq!(registrar.party_serials.len(), 1);
}

#[test]
fn unreachable_unknown_receiver_is_skipped() {
    let dir = tempfile::tempdir().unwrap();

    let (devices, registrar) = run_pass(
        dir.path(),
        platform_config(vec![receiver("192.168.1.50")]),
        MockNetwork::default(),
    );

    assert!(devices.is_empty());
    assert!(registrar.receivers.is_empty());
    assert!(registrar.party_serials.is_empty());
}

#[test]
fn invalid_and_missing_addresses_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let network = MockNetwork::default().with_device(
        "192.168.1.50",
        create_system_config("RX1", &[], &[("AV_1", "AV1")]),
    );

    let config = platform_config(vec![
        ReceiverDescriptor::default(),      // no ip
        receiver("receiver.local"),         // not an IPv4 literal
        receiver("192.168.1.50"),
    ]);

    let (devices, registrar) = run_pass(dir.path(), config, network);

    assert_eq!(devices.len(), 1);
    assert_eq!(registrar.receivers.len(), 1);
}

#[test]
fn removed_receivers_are_pruned_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let both = platform_config(vec![receiver("192.168.1.50"), receiver("192.168.1.60")]);

    run_pass(
        dir.path(),
        both,
        MockNetwork::default()
            .with_device("192.168.1.50", create_system_config("RX1", &[], &[("AV_1", "AV1")]))
            .with_device("192.168.1.60", create_system_config("RX2", &[], &[("AV_1", "AV1")])),
    );

    // Second receiver dropped from the configuration
    let (devices, _) = run_pass(
        dir.path(),
        platform_config(vec![receiver("192.168.1.50")]),
        MockNetwork::default()
            .with_device("192.168.1.50", create_system_config("RX1", &[], &[("AV_1", "AV1")])),
    );

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "RX1");

    let persisted: Vec<DeviceConfig> = serde_json::from_str(
        &fs::read_to_string(dir.path().join("cachedDevices.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(persisted.len(), 1);
}

#[test]
fn zone_volume_bounds_inherit_and_override() {
    let dir = tempfile::tempdir().unwrap();
    let system = create_system_config("RX1", &[2, 3], &[("AV_1", "AV1")]);

    run_pass(
        dir.path(),
        platform_config(vec![receiver("192.168.1.50")]),
        MockNetwork::default().with_device("192.168.1.50", system.clone()),
    );

    let rx = ReceiverDescriptor {
        ip: Some("192.168.1.50".to_string()),
        min_volume: Some(-60.0),
        max_volume: Some(-20.0),
        zone3_min_volume: Some(-42.0),
        ..Default::default()
    };
    let (devices, _) = run_pass(
        dir.path(),
        platform_config(vec![rx]),
        MockNetwork::default().with_device("192.168.1.50", system),
    );

    let device = &devices[0];
    // Zone 2 has no override: inherits zone 1's merged bounds exactly
    let zone2 = device.zone2.as_ref().unwrap();
    assert_eq!(zone2.min_volume, -60.0);
    assert_eq!(zone2.max_volume, -20.0);
    // Zone 3 uses its own min verbatim, inherits the max
    let zone3 = device.zone3.as_ref().unwrap();
    assert_eq!(zone3.min_volume, -42.0);
    assert_eq!(zone3.max_volume, -20.0);
}

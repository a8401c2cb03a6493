//! Party mode toggle accessory.
//!
//! Party mode mirrors the main zone's source and volume to every zone of a
//! receiver. The accessory is a single boolean switch; reads and writes go
//! straight to the receiver, and any capability error surfaces to the host
//! unchanged so a failed toggle shows up as a failed toggle.

use avr_client::ClientError;

use crate::registrar::{AccessoryInformation, ReceiverClient};

/// Boolean "On" switch backed by the receiver's party mode API
#[derive(Debug, Clone)]
pub struct PartySwitch<C> {
    name: String,
    info: AccessoryInformation,
    client: C,
}

impl<C: ReceiverClient> PartySwitch<C> {
    pub fn new(client: C, info: AccessoryInformation) -> Self {
        Self {
            name: "Party Mode".to_string(),
            info,
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &AccessoryInformation {
        &self.info
    }

    /// Current switch state, read from the receiver.
    pub fn is_on(&self) -> Result<bool, ClientError> {
        self.client.is_party_mode_enabled()
    }

    /// Turn party mode on: power up the receiver first, then enable the
    /// mode. Success is reported only after both steps succeed.
    pub fn turn_on(&self) -> Result<(), ClientError> {
        self.client.power_on()?;
        self.client.party_mode_on()
    }

    /// Turn party mode off. Power state is left alone.
    pub fn turn_off(&self) -> Result<(), ClientError> {
        self.client.party_mode_off()
    }
}

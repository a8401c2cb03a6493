//! Minimal Yamaha Network Control (YNC) client
//!
//! This crate provides a small HTTP client for the XML control protocol
//! spoken by Yamaha AV receivers. Commands are POSTed as XML documents to
//! `/YamahaRemoteControl/ctrl` and responses carry a numeric `RC` return
//! code on the root element.
//!
//! Only the operations the accessory bridge needs are implemented: system
//! configuration retrieval, main-zone power-on, and party mode control.

mod error;
mod system_config;

pub use error::{ClientError, Result};
pub use system_config::SystemConfig;

use std::time::Duration;
use xmltree::Element;

/// Path every YNC control request is POSTed to.
const CTRL_PATH: &str = "YamahaRemoteControl/ctrl";

/// A client for a single Yamaha receiver
///
/// Cloning is cheap: the underlying HTTP agent shares its connection pool
/// across clones, so one receiver's accessories can all hold a copy.
#[derive(Debug, Clone)]
pub struct YamahaClient {
    agent: ureq::Agent,
    base_url: String,
}

impl YamahaClient {
    /// Create a client for the receiver at the given IP address.
    ///
    /// Receivers serve the control endpoint on port 80.
    pub fn new(ip: &str) -> Self {
        Self::with_base_url(format!("http://{}", ip))
    }

    /// Create a client against an explicit base URL (for tests and
    /// non-standard ports).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(10))
                .build(),
            base_url: base_url.into(),
        }
    }

    /// Fetch and parse the receiver's system configuration.
    pub fn get_system_config(&self) -> Result<SystemConfig> {
        let response = self.request(
            "GET",
            "<System><Config>GetParam</Config></System>",
        )?;
        SystemConfig::from_element(&response)
    }

    /// Power on the main zone.
    pub fn power_on(&self) -> Result<()> {
        self.request(
            "PUT",
            "<Main_Zone><Power_Control><Power>On</Power></Power_Control></Main_Zone>",
        )?;
        Ok(())
    }

    /// Query whether party mode is currently enabled.
    pub fn is_party_mode_enabled(&self) -> Result<bool> {
        let response = self.request(
            "GET",
            "<System><Party_Mode><Mode>GetParam</Mode></Party_Mode></System>",
        )?;

        let mode = response
            .get_child("System")
            .and_then(|s| s.get_child("Party_Mode"))
            .and_then(|p| p.get_child("Mode"))
            .and_then(|m| m.get_text())
            .ok_or_else(|| ClientError::Parse("Missing Party_Mode/Mode element".to_string()))?;

        Ok(mode == "On")
    }

    /// Enable party mode.
    pub fn party_mode_on(&self) -> Result<()> {
        self.request(
            "PUT",
            "<System><Party_Mode><Mode>On</Mode></Party_Mode></System>",
        )?;
        Ok(())
    }

    /// Disable party mode.
    pub fn party_mode_off(&self) -> Result<()> {
        self.request(
            "PUT",
            "<System><Party_Mode><Mode>Off</Mode></Party_Mode></System>",
        )?;
        Ok(())
    }

    /// Send a YNC command and return the parsed `YAMAHA_AV` response element.
    fn request(&self, cmd: &str, payload: &str) -> Result<Element> {
        let body = format!(r#"<YAMAHA_AV cmd="{}">{}</YAMAHA_AV>"#, cmd, payload);
        let url = format!("{}/{}", self.base_url, CTRL_PATH);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .send_string(&body)
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let xml_text = response
            .into_string()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        check_return_code(&xml)?;
        Ok(xml)
    }
}

/// Check the `RC` attribute on a `YAMAHA_AV` response element.
///
/// Receivers report `RC="0"` for success; anything else is a device fault.
/// A missing attribute is treated as success.
fn check_return_code(root: &Element) -> Result<()> {
    match root.attributes.get("RC").map(String::as_str) {
        None | Some("0") => Ok(()),
        Some(rc) => Err(ClientError::Fault(rc.parse::<u16>().unwrap_or(500))),
    }
}

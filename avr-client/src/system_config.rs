//! System configuration parsing.
//!
//! This module handles parsing the `<System><Config>` response a Yamaha
//! receiver returns for a `GetParam` request, and exposes it as a typed
//! structure the bridge layer can reason about.

use crate::error::{ClientError, Result};
use indexmap::IndexMap;
use xmltree::{Element, XMLNode};

/// System configuration reported by a receiver.
///
/// `features` and `inputs` keep document order: the receiver lists inputs in
/// the order it wants them presented, and that order is observable in the
/// derived accessory configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Stable device identifier (`System_ID`), e.g. "0A12345B"
    pub id: String,
    /// Model name (`Model_Name`), e.g. "RX-V675"
    pub model: String,
    /// Feature existence flags (`Feature_Existence` children), `"1"`/`"0"`
    pub features: IndexMap<String, String>,
    /// Raw input key to display name (`Name/Input` children)
    pub inputs: IndexMap<String, String>,
}

impl SystemConfig {
    /// Parse a system configuration from a full `YAMAHA_AV` response document.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` if the XML is malformed or any of the
    /// required sections (`System_ID`, `Model_Name`, `Feature_Existence`,
    /// `Name/Input`) are missing.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = Element::parse(xml.as_bytes())
            .map_err(|e| ClientError::Parse(format!("Failed to parse system config XML: {}", e)))?;
        Self::from_element(&root)
    }

    /// Extract a system configuration from a parsed `YAMAHA_AV` element.
    pub(crate) fn from_element(root: &Element) -> Result<Self> {
        let config = root
            .get_child("System")
            .and_then(|s| s.get_child("Config"))
            .ok_or_else(|| ClientError::Parse("Missing System/Config element".to_string()))?;

        let id = child_text(config, "System_ID")?;
        let model = child_text(config, "Model_Name")?;

        let features = config
            .get_child("Feature_Existence")
            .map(child_text_map)
            .ok_or_else(|| ClientError::Parse("Missing Feature_Existence element".to_string()))?;

        let inputs = config
            .get_child("Name")
            .and_then(|n| n.get_child("Input"))
            .map(child_text_map)
            .ok_or_else(|| ClientError::Parse("Missing Name/Input element".to_string()))?;

        Ok(Self {
            id,
            model,
            features,
            inputs,
        })
    }
}

fn child_text(parent: &Element, name: &str) -> Result<String> {
    parent
        .get_child(name)
        .and_then(|c| c.get_text())
        .map(|t| t.into_owned())
        .ok_or_else(|| ClientError::Parse(format!("Missing {} element", name)))
}

/// Collect every child element of `parent` into an ordered name-to-text map.
///
/// Elements without text content map to an empty string.
fn child_text_map(parent: &Element) -> IndexMap<String, String> {
    parent
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(el) => Some((
                el.name.clone(),
                el.get_text().map(|t| t.into_owned()).unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

//! Dashboard API v0 models shared by the client and its callers.
//!
//! Port numbers stay string-typed throughout: the API echoes them as
//! numbers or strings depending on endpoint, and the source file
//! preserves them verbatim.

use serde::{Deserialize, Serialize};

/// A network within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
    /// Network id.
    pub id: String,
    /// Owning organization id.
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    /// Network name.
    pub name: String,
    /// Time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    /// Dashboard tags applied to the network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// A device in the organization inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryDevice {
    /// Device serial number.
    pub serial: String,
    /// Device MAC address.
    pub mac: String,
    /// Hardware model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Network the device is claimed into, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "networkId")]
    pub network_id: Option<String>,
    /// Device name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Configuration of one port on a switch, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchPort {
    /// Port number, local to the device.
    pub number: serde_json::Value,
    /// Configured port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dashboard tags applied to the port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Whether the port is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Port type (`access` or `trunk`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub port_type: Option<String>,
    /// Access VLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    /// Voice VLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "voiceVlan")]
    pub voice_vlan: Option<u16>,
    /// Access policy slot configured on the port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "accessPolicyNumber")]
    pub access_policy_number: Option<i32>,
}

impl SwitchPort {
    /// Port number as a string, however the API chose to encode it.
    #[must_use]
    pub fn number_string(&self) -> String {
        match &self.number {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Request payload for updating one switch port.
///
/// Only the fields present are sent; the rename path sets exactly
/// `{"name": ...}`. Serialization escapes whatever text the desired
/// name carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateSwitchPortRequest {
    /// New port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Enable or disable the port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New access VLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    /// New access policy slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "accessPolicyNumber")]
    pub access_policy_number: Option<i32>,
}

impl UpdateSwitchPortRequest {
    /// Payload that renames a port and changes nothing else.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A client seen by a device, as returned by the clients endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkClient {
    /// Client description (usually hostname).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Client MAC address.
    pub mac: String,
    /// Switch port the client was seen on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switchport: Option<String>,
    /// Last known IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// VLAN the client was seen on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

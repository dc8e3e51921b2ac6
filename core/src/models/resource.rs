//! Response models.
//!
//! Core resources get typed structs. Everything else deserializes into
//! `Resource`, which keeps the common identity fields typed and the rest as
//! raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A nested reference to another resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub href: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub href: String,
    #[serde(default)]
    pub region: Option<Reference>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    pub id: String,
    pub crn: String,
    pub href: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub classic_access: bool,
    #[serde(default)]
    pub default_network_acl: Option<Reference>,
    #[serde(default)]
    pub default_security_group: Option<Reference>,
    #[serde(default)]
    pub resource_group: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub href: String,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub crn: Option<String>,
    #[serde(default)]
    pub ipv4_cidr_block: Option<String>,
    #[serde(default)]
    pub total_ipv4_address_count: Option<u32>,
    #[serde(default)]
    pub available_ipv4_address_count: Option<u32>,
    #[serde(default)]
    pub vpc: Option<Reference>,
    #[serde(default)]
    pub zone: Option<Reference>,
    #[serde(default)]
    pub network_acl: Option<Reference>,
    #[serde(default)]
    pub public_gateway: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: String,
    pub crn: String,
    pub href: String,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zone: Option<Reference>,
    #[serde(default)]
    pub target: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub id: String,
    pub crn: String,
    pub href: String,
    pub name: String,
    pub public_key: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub crn: String,
    pub href: String,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub memory: Option<u32>,
    #[serde(default)]
    pub profile: Option<Reference>,
    #[serde(default)]
    pub image: Option<Reference>,
    #[serde(default)]
    pub vpc: Option<Reference>,
    #[serde(default)]
    pub zone: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub crn: String,
    pub href: String,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub iops: Option<u32>,
    #[serde(default)]
    pub profile: Option<Reference>,
    #[serde(default)]
    pub zone: Option<Reference>,
}

/// Any resource, with unmodelled fields kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lifecycle state; named `provisioning_status` on load balancers.
    #[serde(default, alias = "provisioning_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

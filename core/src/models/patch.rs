//! Partial-update payloads.
//!
//! Patch models hold only optional fields. `as_patch` turns one into the JSON
//! object that is actually sent, containing just the fields that are set.

use serde::Serialize;
use serde_json::{Map, Value};

use super::identity::{NetworkAclIdentity, PublicGatewayIdentity};
use crate::error::ApiError;

pub trait Patch: Serialize {
    fn as_patch(&self) -> Result<Map<String, Value>, ApiError> {
        match serde_json::to_value(self).map_err(|e| ApiError::Serialization(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(ApiError::Serialization(format!(
                "patch must serialize to an object, got {other}"
            ))),
        }
    }
}

/// Rename a resource. Most resources allow nothing else to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NamePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Patch for NamePatch {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubnetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_acl: Option<NetworkAclIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_gateway: Option<PublicGatewayIdentity>,
}

impl Patch for SubnetPatch {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressPrefixPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl Patch for AddressPrefixPatch {}

/// Free-form patches for resources without a dedicated model.
impl Patch for Map<String, Value> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let patch = SubnetPatch {
            public_gateway: Some(PublicGatewayIdentity::by_id("pgw-1").unwrap()),
            ..Default::default()
        };
        let map = patch.as_patch().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["public_gateway"], serde_json::json!({"id": "pgw-1"}));
    }

    #[test]
    fn empty_patch_is_empty_object() {
        assert!(NamePatch::default().as_patch().unwrap().is_empty());
    }

    #[test]
    fn address_prefix_patch_keeps_false() {
        let patch = AddressPrefixPatch {
            name: None,
            is_default: Some(false),
        };
        assert_eq!(patch.as_patch().unwrap()["is_default"], Value::Bool(false));
    }
}

//! Creation payloads.
//!
//! Required fields are constructor arguments and are checked for emptiness;
//! optional fields are public and default to unset. Where the API accepts
//! several shapes for one resource (a subnet sized by address count or by
//! CIDR block) the prototype is an enum with one variant per shape.

use serde::{Deserialize, Serialize};

use super::identity::{
    EncryptionKeyIdentity, NetworkAclIdentity, NetworkInterfaceIdentity, OperatingSystemIdentity,
    PublicGatewayIdentity, ResourceGroupIdentity, SecurityGroupIdentity, VolumeProfileIdentity,
    VpcIdentity, ZoneIdentity,
};
use crate::error::ApiError;

fn require(field: &'static str, value: String) -> Result<String, ApiError> {
    if value.is_empty() {
        Err(ApiError::MissingField(field))
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressPrefixManagement {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcPrototype {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefix_management: Option<AddressPrefixManagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_access: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<ResourceGroupIdentity>,
}

impl VpcPrototype {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPrototype {
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<ResourceGroupIdentity>,
}

impl KeyPrototype {
    pub fn new(public_key: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            public_key: require("public_key", public_key.into())?,
            name: None,
            key_type: None,
            resource_group: None,
        })
    }
}

/// A floating IP is reserved either in a zone or directly on a network
/// interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FloatingIpPrototype {
    ByZone {
        zone: ZoneIdentity,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resource_group: Option<ResourceGroupIdentity>,
    },
    ByTarget {
        target: NetworkInterfaceIdentity,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resource_group: Option<ResourceGroupIdentity>,
    },
}

impl FloatingIpPrototype {
    pub fn by_zone(zone: ZoneIdentity) -> Self {
        FloatingIpPrototype::ByZone {
            zone,
            name: None,
            resource_group: None,
        }
    }

    pub fn by_target(target: NetworkInterfaceIdentity) -> Self {
        FloatingIpPrototype::ByTarget {
            target,
            name: None,
            resource_group: None,
        }
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            FloatingIpPrototype::ByZone { name, .. } | FloatingIpPrototype::ByTarget { name, .. } => {
                *name = Some(value.into())
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubnetPrototype {
    ByTotalCount {
        vpc: VpcIdentity,
        total_ipv4_address_count: u32,
        zone: ZoneIdentity,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        network_acl: Option<NetworkAclIdentity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        public_gateway: Option<PublicGatewayIdentity>,
    },
    ByCidr {
        vpc: VpcIdentity,
        ipv4_cidr_block: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        zone: Option<ZoneIdentity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        network_acl: Option<NetworkAclIdentity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        public_gateway: Option<PublicGatewayIdentity>,
    },
}

impl SubnetPrototype {
    /// Size the subnet by address count; the count must be a power of two
    /// of at least 8.
    pub fn by_total_count(vpc: VpcIdentity, total: u32, zone: ZoneIdentity) -> Result<Self, ApiError> {
        if total < 8 || !total.is_power_of_two() {
            return Err(ApiError::InvalidField(
                "total_ipv4_address_count",
                format!("{total} is not a power of two of at least 8"),
            ));
        }
        Ok(SubnetPrototype::ByTotalCount {
            vpc,
            total_ipv4_address_count: total,
            zone,
            name: None,
            network_acl: None,
            public_gateway: None,
        })
    }

    pub fn by_cidr(vpc: VpcIdentity, cidr: impl Into<String>) -> Result<Self, ApiError> {
        Ok(SubnetPrototype::ByCidr {
            vpc,
            ipv4_cidr_block: require("ipv4_cidr_block", cidr.into())?,
            zone: None,
            name: None,
            network_acl: None,
            public_gateway: None,
        })
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            SubnetPrototype::ByTotalCount { name, .. } | SubnetPrototype::ByCidr { name, .. } => {
                *name = Some(value.into())
            }
        }
        self
    }

    pub fn with_public_gateway(mut self, gateway: PublicGatewayIdentity) -> Self {
        match &mut self {
            SubnetPrototype::ByTotalCount { public_gateway, .. }
            | SubnetPrototype::ByCidr { public_gateway, .. } => *public_gateway = Some(gateway),
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFilePrototype {
    pub href: String,
}

/// Images are imported from a file in Cloud Object Storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImagePrototype {
    ByFile {
        file: ImageFilePrototype,
        operating_system: OperatingSystemIdentity,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resource_group: Option<ResourceGroupIdentity>,
    },
}

impl ImagePrototype {
    pub fn by_file(
        file_href: impl Into<String>,
        operating_system: OperatingSystemIdentity,
    ) -> Result<Self, ApiError> {
        Ok(ImagePrototype::ByFile {
            file: ImageFilePrototype {
                href: require("file.href", file_href.into())?,
            },
            operating_system,
            name: None,
            resource_group: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePrototype {
    pub profile: VolumeProfileIdentity,
    pub zone: ZoneIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<EncryptionKeyIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<ResourceGroupIdentity>,
}

impl VolumePrototype {
    pub fn new(profile: VolumeProfileIdentity, zone: ZoneIdentity) -> Self {
        Self {
            profile,
            zone,
            capacity: None,
            iops: None,
            name: None,
            encryption_key: None,
            resource_group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicGatewayPrototype {
    pub vpc: VpcIdentity,
    pub zone: ZoneIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<ResourceGroupIdentity>,
}

impl PublicGatewayPrototype {
    pub fn new(vpc: VpcIdentity, zone: ZoneIdentity) -> Self {
        Self {
            vpc,
            zone,
            name: None,
            resource_group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressPrefixPrototype {
    pub cidr: String,
    pub zone: ZoneIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AddressPrefixPrototype {
    pub fn new(cidr: impl Into<String>, zone: ZoneIdentity) -> Result<Self, ApiError> {
        Ok(Self {
            cidr: require("cidr", cidr.into())?,
            zone,
            name: None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Where rule traffic comes from (inbound) or goes to (outbound).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleRemote {
    CidrBlock { cidr_block: String },
    Address { address: String },
    SecurityGroup(SecurityGroupIdentity),
}

/// Protocol-specific rule fields, tagged by `protocol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum RuleProtocol {
    All,
    Icmp {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<u8>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        icmp_type: Option<u8>,
    },
    Tcp {
        #[serde(skip_serializing_if = "Option::is_none")]
        port_min: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        port_max: Option<u16>,
    },
    Udp {
        #[serde(skip_serializing_if = "Option::is_none")]
        port_min: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        port_max: Option<u16>,
    },
}

impl RuleProtocol {
    /// A tcp rule. Leaving both ports unset covers every port.
    pub fn tcp(port_min: Option<u16>, port_max: Option<u16>) -> Result<Self, ApiError> {
        let rule = RuleProtocol::Tcp {
            port_min,
            port_max,
        };
        rule.check()?;
        Ok(rule)
    }

    /// A udp rule. Leaving both ports unset covers every port.
    pub fn udp(port_min: Option<u16>, port_max: Option<u16>) -> Result<Self, ApiError> {
        let rule = RuleProtocol::Udp {
            port_min,
            port_max,
        };
        rule.check()?;
        Ok(rule)
    }

    /// Rejects a port of zero and a range whose bounds are both set but reversed.
    pub fn check(&self) -> Result<(), ApiError> {
        match *self {
            RuleProtocol::Tcp { port_min, port_max } | RuleProtocol::Udp { port_min, port_max } => {
                check_ports(port_min, port_max)
            }
            RuleProtocol::All | RuleProtocol::Icmp { .. } => Ok(()),
        }
    }
}

fn check_ports(port_min: Option<u16>, port_max: Option<u16>) -> Result<(), ApiError> {
    if port_min == Some(0) || port_max == Some(0) {
        return Err(ApiError::InvalidField("port_min", "port 0 is not a valid port".to_string()));
    }
    if let (Some(min), Some(max)) = (port_min, port_max) {
        if min > max {
            return Err(ApiError::InvalidField("port_min", format!("port range {min}-{max} is empty")));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupRulePrototype {
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<RuleRemote>,
    #[serde(flatten)]
    pub protocol: RuleProtocol,
}

impl SecurityGroupRulePrototype {
    /// Fails when `protocol` carries an invalid port range.
    pub fn new(direction: Direction, protocol: RuleProtocol) -> Result<Self, ApiError> {
        protocol.check()?;
        Ok(Self {
            direction,
            ip_version: None,
            remote: None,
            protocol,
        })
    }

    pub fn with_remote(mut self, remote: RuleRemote) -> Self {
        self.remote = Some(remote);
        self
    }
}

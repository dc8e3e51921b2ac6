//! The VPC classic REST surface as a single table.
//!
//! # Design
//! Every API operation is one `Operation` variant carrying its method, path
//! template, expected success status and whether it sends a JSON body. The
//! client derives request building and response parsing from these facts, so
//! adding an endpoint is one line in the table below.

use crate::http::HttpMethod;

macro_rules! operations {
    (@body) => { false };
    (@body body) => { true };
    ($($variant:ident: $method:ident $path:literal => $status:literal $(with $body:ident)?;)+) => {
        /// A single operation of the VPC classic API.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($variant,)+
        }

        impl Operation {
            /// Every operation, in table order.
            pub const ALL: &'static [Operation] = &[$(Operation::$variant,)+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Operation::$variant => stringify!($variant),)+
                }
            }

            pub fn method(&self) -> HttpMethod {
                match self {
                    $(Operation::$variant => HttpMethod::$method,)+
                }
            }

            /// Path relative to the service URL, with `{name}` placeholders.
            pub fn path_template(&self) -> &'static str {
                match self {
                    $(Operation::$variant => $path,)+
                }
            }

            /// The status code a successful call returns.
            pub fn expected_status(&self) -> u16 {
                match self {
                    $(Operation::$variant => $status,)+
                }
            }

            /// Whether the operation sends a JSON request body.
            pub fn takes_body(&self) -> bool {
                match self {
                    $(Operation::$variant => operations!(@body $($body)?),)+
                }
            }
        }
    };
}

operations! {
    // Geography
    ListRegions: Get "/regions" => 200;
    GetRegion: Get "/regions/{name}" => 200;
    ListRegionZones: Get "/regions/{region_name}/zones" => 200;
    GetRegionZone: Get "/regions/{region_name}/zones/{zone_name}" => 200;

    // Floating IPs
    ListFloatingIps: Get "/floating_ips" => 200;
    CreateFloatingIp: Post "/floating_ips" => 201 with body;
    DeleteFloatingIp: Delete "/floating_ips/{id}" => 204;
    GetFloatingIp: Get "/floating_ips/{id}" => 200;
    UpdateFloatingIp: Patch "/floating_ips/{id}" => 200 with body;

    // Keys
    ListKeys: Get "/keys" => 200;
    CreateKey: Post "/keys" => 201 with body;
    DeleteKey: Delete "/keys/{id}" => 204;
    GetKey: Get "/keys/{id}" => 200;
    UpdateKey: Patch "/keys/{id}" => 200 with body;

    // VPCs
    ListVpcs: Get "/vpcs" => 200;
    CreateVpc: Post "/vpcs" => 201 with body;
    DeleteVpc: Delete "/vpcs/{id}" => 204;
    GetVpc: Get "/vpcs/{id}" => 200;
    UpdateVpc: Patch "/vpcs/{id}" => 200 with body;
    GetVpcDefaultSecurityGroup: Get "/vpcs/{id}/default_security_group" => 200;
    ListVpcAddressPrefixes: Get "/vpcs/{vpc_id}/address_prefixes" => 200;
    CreateVpcAddressPrefix: Post "/vpcs/{vpc_id}/address_prefixes" => 201 with body;
    DeleteVpcAddressPrefix: Delete "/vpcs/{vpc_id}/address_prefixes/{id}" => 204;
    GetVpcAddressPrefix: Get "/vpcs/{vpc_id}/address_prefixes/{id}" => 200;
    UpdateVpcAddressPrefix: Patch "/vpcs/{vpc_id}/address_prefixes/{id}" => 200 with body;
    ListVpcRoutes: Get "/vpcs/{vpc_id}/routes" => 200;
    CreateVpcRoute: Post "/vpcs/{vpc_id}/routes" => 201 with body;
    DeleteVpcRoute: Delete "/vpcs/{vpc_id}/routes/{id}" => 204;
    GetVpcRoute: Get "/vpcs/{vpc_id}/routes/{id}" => 200;
    UpdateVpcRoute: Patch "/vpcs/{vpc_id}/routes/{id}" => 200 with body;

    // Volumes
    ListVolumeProfiles: Get "/volume/profiles" => 200;
    GetVolumeProfile: Get "/volume/profiles/{name}" => 200;
    ListVolumes: Get "/volumes" => 200;
    CreateVolume: Post "/volumes" => 201 with body;
    DeleteVolume: Delete "/volumes/{id}" => 204;
    GetVolume: Get "/volumes/{id}" => 200;
    UpdateVolume: Patch "/volumes/{id}" => 200 with body;

    // Subnets
    ListSubnets: Get "/subnets" => 200;
    CreateSubnet: Post "/subnets" => 201 with body;
    DeleteSubnet: Delete "/subnets/{id}" => 204;
    GetSubnet: Get "/subnets/{id}" => 200;
    UpdateSubnet: Patch "/subnets/{id}" => 200 with body;
    GetSubnetNetworkAcl: Get "/subnets/{id}/network_acl" => 200;
    ReplaceSubnetNetworkAcl: Put "/subnets/{id}/network_acl" => 201 with body;
    UnsetSubnetPublicGateway: Delete "/subnets/{id}/public_gateway" => 204;
    GetSubnetPublicGateway: Get "/subnets/{id}/public_gateway" => 200;
    SetSubnetPublicGateway: Put "/subnets/{id}/public_gateway" => 201 with body;

    // Images
    ListImages: Get "/images" => 200;
    CreateImage: Post "/images" => 201 with body;
    DeleteImage: Delete "/images/{id}" => 202;
    GetImage: Get "/images/{id}" => 200;
    UpdateImage: Patch "/images/{id}" => 200 with body;
    ListOperatingSystems: Get "/operating_systems" => 200;
    GetOperatingSystem: Get "/operating_systems/{name}" => 200;

    // Instances
    ListInstanceProfiles: Get "/instance/profiles" => 200;
    GetInstanceProfile: Get "/instance/profiles/{name}" => 200;
    ListInstances: Get "/instances" => 200;
    CreateInstance: Post "/instances" => 201 with body;
    DeleteInstance: Delete "/instances/{id}" => 204;
    GetInstance: Get "/instances/{id}" => 200;
    UpdateInstance: Patch "/instances/{id}" => 200 with body;
    GetInstanceInitialization: Get "/instances/{id}/initialization" => 200;
    CreateInstanceAction: Post "/instances/{instance_id}/actions" => 201 with body;
    ListInstanceNetworkInterfaces: Get "/instances/{instance_id}/network_interfaces" => 200;
    GetInstanceNetworkInterface: Get "/instances/{instance_id}/network_interfaces/{id}" => 200;
    ListInstanceNetworkInterfaceFloatingIps: Get "/instances/{instance_id}/network_interfaces/{network_interface_id}/floating_ips" => 200;
    RemoveInstanceNetworkInterfaceFloatingIp: Delete "/instances/{instance_id}/network_interfaces/{network_interface_id}/floating_ips/{id}" => 204;
    GetInstanceNetworkInterfaceFloatingIp: Get "/instances/{instance_id}/network_interfaces/{network_interface_id}/floating_ips/{id}" => 200;
    AddInstanceNetworkInterfaceFloatingIp: Put "/instances/{instance_id}/network_interfaces/{network_interface_id}/floating_ips/{id}" => 201;
    ListInstanceVolumeAttachments: Get "/instances/{instance_id}/volume_attachments" => 200;
    CreateInstanceVolumeAttachment: Post "/instances/{instance_id}/volume_attachments" => 201 with body;
    DeleteInstanceVolumeAttachment: Delete "/instances/{instance_id}/volume_attachments/{id}" => 204;
    GetInstanceVolumeAttachment: Get "/instances/{instance_id}/volume_attachments/{id}" => 200;
    UpdateInstanceVolumeAttachment: Patch "/instances/{instance_id}/volume_attachments/{id}" => 200 with body;

    // Public gateways
    ListPublicGateways: Get "/public_gateways" => 200;
    CreatePublicGateway: Post "/public_gateways" => 201 with body;
    DeletePublicGateway: Delete "/public_gateways/{id}" => 204;
    GetPublicGateway: Get "/public_gateways/{id}" => 200;
    UpdatePublicGateway: Patch "/public_gateways/{id}" => 200 with body;

    // Network ACLs
    ListNetworkAcls: Get "/network_acls" => 200;
    CreateNetworkAcl: Post "/network_acls" => 201 with body;
    DeleteNetworkAcl: Delete "/network_acls/{id}" => 204;
    GetNetworkAcl: Get "/network_acls/{id}" => 200;
    UpdateNetworkAcl: Patch "/network_acls/{id}" => 200 with body;
    ListNetworkAclRules: Get "/network_acls/{network_acl_id}/rules" => 200;
    CreateNetworkAclRule: Post "/network_acls/{network_acl_id}/rules" => 201 with body;
    DeleteNetworkAclRule: Delete "/network_acls/{network_acl_id}/rules/{id}" => 204;
    GetNetworkAclRule: Get "/network_acls/{network_acl_id}/rules/{id}" => 200;
    UpdateNetworkAclRule: Patch "/network_acls/{network_acl_id}/rules/{id}" => 200 with body;

    // Security groups
    ListSecurityGroups: Get "/security_groups" => 200;
    CreateSecurityGroup: Post "/security_groups" => 201 with body;
    DeleteSecurityGroup: Delete "/security_groups/{id}" => 204;
    GetSecurityGroup: Get "/security_groups/{id}" => 200;
    UpdateSecurityGroup: Patch "/security_groups/{id}" => 200 with body;
    ListSecurityGroupNetworkInterfaces: Get "/security_groups/{security_group_id}/network_interfaces" => 200;
    RemoveSecurityGroupNetworkInterface: Delete "/security_groups/{security_group_id}/network_interfaces/{id}" => 204;
    GetSecurityGroupNetworkInterface: Get "/security_groups/{security_group_id}/network_interfaces/{id}" => 200;
    AddSecurityGroupNetworkInterface: Put "/security_groups/{security_group_id}/network_interfaces/{id}" => 201;
    ListSecurityGroupRules: Get "/security_groups/{security_group_id}/rules" => 200;
    CreateSecurityGroupRule: Post "/security_groups/{security_group_id}/rules" => 201 with body;
    DeleteSecurityGroupRule: Delete "/security_groups/{security_group_id}/rules/{id}" => 204;
    GetSecurityGroupRule: Get "/security_groups/{security_group_id}/rules/{id}" => 200;
    UpdateSecurityGroupRule: Patch "/security_groups/{security_group_id}/rules/{id}" => 200 with body;

    // Load balancers
    ListLoadBalancers: Get "/load_balancers" => 200;
    CreateLoadBalancer: Post "/load_balancers" => 201 with body;
    DeleteLoadBalancer: Delete "/load_balancers/{id}" => 202;
    GetLoadBalancer: Get "/load_balancers/{id}" => 200;
    UpdateLoadBalancer: Patch "/load_balancers/{id}" => 200 with body;
    GetLoadBalancerStatistics: Get "/load_balancers/{id}/statistics" => 200;
    ListLoadBalancerListeners: Get "/load_balancers/{load_balancer_id}/listeners" => 200;
    CreateLoadBalancerListener: Post "/load_balancers/{load_balancer_id}/listeners" => 201 with body;
    DeleteLoadBalancerListener: Delete "/load_balancers/{load_balancer_id}/listeners/{id}" => 202;
    GetLoadBalancerListener: Get "/load_balancers/{load_balancer_id}/listeners/{id}" => 200;
    UpdateLoadBalancerListener: Patch "/load_balancers/{load_balancer_id}/listeners/{id}" => 200 with body;
    ListLoadBalancerListenerPolicies: Get "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies" => 200;
    CreateLoadBalancerListenerPolicy: Post "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies" => 201 with body;
    DeleteLoadBalancerListenerPolicy: Delete "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{id}" => 202;
    GetLoadBalancerListenerPolicy: Get "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{id}" => 200;
    UpdateLoadBalancerListenerPolicy: Patch "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{id}" => 200 with body;
    ListLoadBalancerListenerPolicyRules: Get "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{policy_id}/rules" => 200;
    CreateLoadBalancerListenerPolicyRule: Post "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{policy_id}/rules" => 201 with body;
    DeleteLoadBalancerListenerPolicyRule: Delete "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{policy_id}/rules/{id}" => 202;
    GetLoadBalancerListenerPolicyRule: Get "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{policy_id}/rules/{id}" => 200;
    UpdateLoadBalancerListenerPolicyRule: Patch "/load_balancers/{load_balancer_id}/listeners/{listener_id}/policies/{policy_id}/rules/{id}" => 200 with body;
    ListLoadBalancerPools: Get "/load_balancers/{load_balancer_id}/pools" => 200;
    CreateLoadBalancerPool: Post "/load_balancers/{load_balancer_id}/pools" => 201 with body;
    DeleteLoadBalancerPool: Delete "/load_balancers/{load_balancer_id}/pools/{id}" => 202;
    GetLoadBalancerPool: Get "/load_balancers/{load_balancer_id}/pools/{id}" => 200;
    UpdateLoadBalancerPool: Patch "/load_balancers/{load_balancer_id}/pools/{id}" => 200 with body;
    ListLoadBalancerPoolMembers: Get "/load_balancers/{load_balancer_id}/pools/{pool_id}/members" => 200;
    CreateLoadBalancerPoolMember: Post "/load_balancers/{load_balancer_id}/pools/{pool_id}/members" => 201 with body;
    ReplaceLoadBalancerPoolMembers: Put "/load_balancers/{load_balancer_id}/pools/{pool_id}/members" => 202 with body;
    DeleteLoadBalancerPoolMember: Delete "/load_balancers/{load_balancer_id}/pools/{pool_id}/members/{id}" => 202;
    GetLoadBalancerPoolMember: Get "/load_balancers/{load_balancer_id}/pools/{pool_id}/members/{id}" => 200;
    UpdateLoadBalancerPoolMember: Patch "/load_balancers/{load_balancer_id}/pools/{pool_id}/members/{id}" => 200 with body;

    // VPN policies
    ListIkePolicies: Get "/ike_policies" => 200;
    CreateIkePolicy: Post "/ike_policies" => 201 with body;
    DeleteIkePolicy: Delete "/ike_policies/{id}" => 204;
    GetIkePolicy: Get "/ike_policies/{id}" => 200;
    UpdateIkePolicy: Patch "/ike_policies/{id}" => 200 with body;
    ListIkePolicyConnections: Get "/ike_policies/{id}/connections" => 200;
    ListIpsecPolicies: Get "/ipsec_policies" => 200;
    CreateIpsecPolicy: Post "/ipsec_policies" => 201 with body;
    DeleteIpsecPolicy: Delete "/ipsec_policies/{id}" => 204;
    GetIpsecPolicy: Get "/ipsec_policies/{id}" => 200;
    UpdateIpsecPolicy: Patch "/ipsec_policies/{id}" => 200 with body;
    ListIpsecPolicyConnections: Get "/ipsec_policies/{id}/connections" => 200;

    // VPN gateways
    ListVpnGateways: Get "/vpn_gateways" => 200;
    CreateVpnGateway: Post "/vpn_gateways" => 201 with body;
    DeleteVpnGateway: Delete "/vpn_gateways/{id}" => 202;
    GetVpnGateway: Get "/vpn_gateways/{id}" => 200;
    UpdateVpnGateway: Patch "/vpn_gateways/{id}" => 200 with body;
    ListVpnGatewayConnections: Get "/vpn_gateways/{vpn_gateway_id}/connections" => 200;
    CreateVpnGatewayConnection: Post "/vpn_gateways/{vpn_gateway_id}/connections" => 201 with body;
    DeleteVpnGatewayConnection: Delete "/vpn_gateways/{vpn_gateway_id}/connections/{id}" => 202;
    GetVpnGatewayConnection: Get "/vpn_gateways/{vpn_gateway_id}/connections/{id}" => 200;
    UpdateVpnGatewayConnection: Patch "/vpn_gateways/{vpn_gateway_id}/connections/{id}" => 200 with body;
    ListVpnGatewayConnectionLocalCidrs: Get "/vpn_gateways/{vpn_gateway_id}/connections/{id}/local_cidrs" => 200;
    RemoveVpnGatewayConnectionLocalCidr: Delete "/vpn_gateways/{vpn_gateway_id}/connections/{id}/local_cidrs/{prefix_address}/{prefix_length}" => 204;
    CheckVpnGatewayConnectionLocalCidr: Get "/vpn_gateways/{vpn_gateway_id}/connections/{id}/local_cidrs/{prefix_address}/{prefix_length}" => 204;
    AddVpnGatewayConnectionLocalCidr: Put "/vpn_gateways/{vpn_gateway_id}/connections/{id}/local_cidrs/{prefix_address}/{prefix_length}" => 201;
    ListVpnGatewayConnectionPeerCidrs: Get "/vpn_gateways/{vpn_gateway_id}/connections/{id}/peer_cidrs" => 200;
    RemoveVpnGatewayConnectionPeerCidr: Delete "/vpn_gateways/{vpn_gateway_id}/connections/{id}/peer_cidrs/{prefix_address}/{prefix_length}" => 204;
    CheckVpnGatewayConnectionPeerCidr: Get "/vpn_gateways/{vpn_gateway_id}/connections/{id}/peer_cidrs/{prefix_address}/{prefix_length}" => 204;
    AddVpnGatewayConnectionPeerCidr: Put "/vpn_gateways/{vpn_gateway_id}/connections/{id}/peer_cidrs/{prefix_address}/{prefix_length}" => 201;
}

impl Operation {
    /// Placeholder names of the path template, in order.
    pub fn path_params(&self) -> Vec<&'static str> {
        self.path_template()
            .split('/')
            .filter_map(placeholder)
            .collect()
    }

    /// The JSON key holding the items of a list operation's response, which
    /// is always the last literal segment of its path.
    pub fn collection_key(&self) -> Option<&'static str> {
        if !self.name().starts_with("List") {
            return None;
        }
        self.path_template()
            .rsplit('/')
            .find(|segment| placeholder(segment).is_none() && !segment.is_empty())
    }

    pub fn is_list(&self) -> bool {
        self.collection_key().is_some()
    }
}

/// `Some("id")` for a `{id}` template segment.
pub(crate) fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn path_params_follow_template_order() {
        assert_eq!(
            Operation::RemoveVpnGatewayConnectionPeerCidr.path_params(),
            vec!["vpn_gateway_id", "id", "prefix_address", "prefix_length"]
        );
        assert!(Operation::ListVpcs.path_params().is_empty());
    }

    #[test]
    fn collection_key_is_last_literal_segment() {
        assert_eq!(Operation::ListVpcs.collection_key(), Some("vpcs"));
        assert_eq!(Operation::ListInstanceProfiles.collection_key(), Some("profiles"));
        assert_eq!(Operation::ListRegionZones.collection_key(), Some("zones"));
        assert_eq!(
            Operation::ListVpnGatewayConnectionLocalCidrs.collection_key(),
            Some("local_cidrs")
        );
        assert_eq!(Operation::GetVpc.collection_key(), None);
        assert_eq!(Operation::GetLoadBalancerStatistics.collection_key(), None);
    }

    #[test]
    fn every_create_and_update_takes_a_body() {
        for op in Operation::ALL {
            match op.method() {
                HttpMethod::Post | HttpMethod::Patch => {
                    assert!(op.takes_body(), "{} should take a body", op.name())
                }
                HttpMethod::Get | HttpMethod::Delete => {
                    assert!(!op.takes_body(), "{} should not take a body", op.name())
                }
                HttpMethod::Put => {}
            }
        }
    }

    #[test]
    fn statuses_match_method_conventions() {
        for op in Operation::ALL {
            let status = op.expected_status();
            match op.method() {
                HttpMethod::Get => assert!(status == 200 || status == 204, "{}", op.name()),
                HttpMethod::Post => assert_eq!(status, 201, "{}", op.name()),
                HttpMethod::Patch => assert_eq!(status, 200, "{}", op.name()),
                HttpMethod::Put => assert!(status == 201 || status == 202, "{}", op.name()),
                HttpMethod::Delete => assert!(status == 202 || status == 204, "{}", op.name()),
            }
        }
    }

    #[test]
    fn method_and_path_pairs_are_unique() {
        let mut seen = HashSet::new();
        for op in Operation::ALL {
            assert!(
                seen.insert((op.method(), op.path_template())),
                "duplicate route for {}",
                op.name()
            );
        }
    }

    #[test]
    fn table_covers_the_whole_surface() {
        assert_eq!(Operation::ALL.len(), 165);
        assert_eq!(Operation::ALL.iter().filter(|op| op.is_list()).count(), 37);
    }
}

//! References to existing resources.
//!
//! Each resource accepts a subset of `id`, `crn`, `href`, `name` (and, for
//! keys, `fingerprint`) as its identity. Every identity is an untagged enum
//! holding exactly one of those, so `VpcIdentity::by_id("r006-...")`
//! serializes as `{"id":"r006-..."}`.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($field:ident) => $ctor:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(untagged)]
        pub enum $name {
            $($variant { $field: String },)+
        }

        impl $name {
            $(
                pub fn $ctor(value: impl Into<String>) -> Result<Self, ApiError> {
                    let value = value.into();
                    if value.is_empty() {
                        return Err(ApiError::MissingField(stringify!($field)));
                    }
                    Ok($name::$variant { $field: value })
                }
            )+

            /// The identifying value, whichever form it takes.
            pub fn value(&self) -> &str {
                match self {
                    $($name::$variant { $field } => $field,)+
                }
            }
        }
    };
}

identity!(VpcIdentity { ById(id) => by_id, ByCrn(crn) => by_crn, ByHref(href) => by_href });
identity!(SubnetIdentity { ById(id) => by_id, ByCrn(crn) => by_crn, ByHref(href) => by_href });
identity!(
    /// Zones are addressed by name, never by id.
    ZoneIdentity { ByName(name) => by_name, ByHref(href) => by_href }
);
identity!(ResourceGroupIdentity { ById(id) => by_id });
identity!(NetworkAclIdentity { ById(id) => by_id, ByHref(href) => by_href });
identity!(PublicGatewayIdentity { ById(id) => by_id, ByCrn(crn) => by_crn, ByHref(href) => by_href });
identity!(SecurityGroupIdentity { ById(id) => by_id, ByCrn(crn) => by_crn, ByHref(href) => by_href });
identity!(KeyIdentity {
    ById(id) => by_id,
    ByCrn(crn) => by_crn,
    ByHref(href) => by_href,
    ByFingerprint(fingerprint) => by_fingerprint,
});
identity!(ImageIdentity { ById(id) => by_id, ByCrn(crn) => by_crn, ByHref(href) => by_href });
identity!(InstanceProfileIdentity { ByName(name) => by_name, ByHref(href) => by_href });
identity!(VolumeProfileIdentity { ByName(name) => by_name, ByHref(href) => by_href });
identity!(OperatingSystemIdentity { ByName(name) => by_name, ByHref(href) => by_href });
identity!(VolumeIdentity { ById(id) => by_id, ByCrn(crn) => by_crn, ByHref(href) => by_href });
identity!(
    /// Customer root keys live in Key Protect and are only known by CRN.
    EncryptionKeyIdentity { ByCrn(crn) => by_crn }
);
identity!(FloatingIpIdentity {
    ById(id) => by_id,
    ByCrn(crn) => by_crn,
    ByHref(href) => by_href,
    ByAddress(address) => by_address,
});
identity!(NetworkInterfaceIdentity { ById(id) => by_id, ByHref(href) => by_href });
identity!(IkePolicyIdentity { ById(id) => by_id, ByHref(href) => by_href });
identity!(IpsecPolicyIdentity { ById(id) => by_id, ByHref(href) => by_href });
identity!(LoadBalancerPoolIdentity { ById(id) => by_id, ByHref(href) => by_href });

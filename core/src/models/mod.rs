//! Request and response models.
//!
//! - `identity`: references to existing resources (by id, CRN, href, name).
//! - `prototype`: creation payloads.
//! - `patch`: partial-update payloads.
//! - `resource`: response bodies.

pub mod identity;
pub mod patch;
pub mod prototype;
pub mod resource;

pub use identity::*;
pub use patch::{AddressPrefixPatch, NamePatch, Patch, SubnetPatch};
pub use prototype::*;
pub use resource::*;

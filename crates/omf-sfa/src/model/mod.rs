// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Standard aggregate-manager resource model.
//!
//! ```text
//! OResource (name)
//! +-- OComponent (component_id, component_manager_id, exclusive)
//! |   +-- Node       <node>       hardware_type, available, interfaces, leases, cmc
//! |   +-- Interface  <interface>  role, mac, ip
//! |   +-- Link       <link>       link_type, interfaces
//! |   +-- Cmc        <omf:cmc>    ip, node
//! +-- Ip             <ip>         address, netmask, type
//! +-- Lease          <ol:lease>   valid_from, valid_until
//! +-- Account        <account>    valid_until
//! ```
//!
//! [`register`] installs namespaces, tags and property definitions into a
//! [`Registry`]; [`ModelFactory`] builds instances for the decoder.

mod account;
mod base;
mod cmc;
mod interface;
mod ip;
mod lease;
mod link;
mod node;

pub use self::account::{Account, ACCOUNT};
pub use self::base::{authority_urn, Core, LOCAL_DOMAIN, O_COMPONENT, O_RESOURCE};
pub use self::cmc::{Cmc, CMC};
pub use self::interface::{Interface, INTERFACE};
pub use self::ip::{Ip, IP};
pub use self::lease::{Lease, LEASE};
pub use self::link::{Link, LINK};
pub use self::node::{Node, NODE};

use crate::error::{CodecError, Result};
use crate::gurn::Gurn;
use crate::registry::{Registry, TypeRef};
use crate::resource::{Resource, ResourceFactory};
use crate::{OMF_NAMESPACE_URI, OMF_PREFIX};

/// Prefix of the lease extension namespace.
pub const OL_PREFIX: &str = "ol";
pub const OL_NAMESPACE_URI: &str = "http://nitlab.inf.uth.gr/schema/sfa/rspec/1";

/// Every model type, roots first.
pub static ALL_TYPES: [TypeRef; 9] = [
    &O_RESOURCE,
    &O_COMPONENT,
    &NODE,
    &INTERFACE,
    &IP,
    &LINK,
    &LEASE,
    &ACCOUNT,
    &CMC,
];

/// Register the model with `registry`. `domain` is the AM's URN domain.
pub fn register(registry: &Registry, domain: &str) -> Result<()> {
    registry.register_namespace(OMF_PREFIX, OMF_NAMESPACE_URI)?;
    registry.register_namespace(OL_PREFIX, OL_NAMESPACE_URI)?;

    registry.register_type(&NODE, "node", None)?;
    registry.register_type(&INTERFACE, "interface", None)?;
    registry.register_type(&IP, "ip", None)?;
    registry.register_type(&LINK, "link", None)?;
    registry.register_type(&LEASE, "lease", Some(OL_PREFIX))?;
    registry.register_type(&ACCOUNT, "account", None)?;
    registry.register_type(&CMC, "cmc", Some(OMF_PREFIX))?;

    self::base::declare(registry, domain);
    node::declare(registry);
    interface::declare(registry);
    ip::declare(registry);
    link::declare(registry);
    lease::declare(registry);
    account::declare(registry);
    cmc::declare(registry);

    log::debug!("[model] registered {} types for domain '{}'", ALL_TYPES.len(), domain);
    Ok(())
}

/// Model type by descriptor name (`"Node"`, `"Lease"`, ...).
pub fn type_by_name(name: &str) -> Option<TypeRef> {
    ALL_TYPES.iter().copied().find(|t| t.name() == name)
}

/// Builds model resources for the decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelFactory;

impl ResourceFactory for ModelFactory {
    fn instantiate(&self, ty: TypeRef, urn: &Gurn) -> Result<Box<dyn Resource>> {
        let core = Core::from_urn(urn);
        let resource: Box<dyn Resource> = match ty.name() {
            "Node" => Box::new(Node::from_core(core)),
            "Interface" => Box::new(Interface::from_core(core)),
            "Ip" => Box::new(Ip::from_core(core)),
            "Link" => Box::new(Link::from_core(core)),
            "Lease" => Box::new(Lease::from_core(core)),
            "Account" => Box::new(Account::from_core(core)),
            "Cmc" => Box::new(Cmc::from_core(core)),
            _ => {
                return Err(CodecError::schema(format!(
                    "cannot instantiate abstract type {:?}",
                    ty
                )))
            }
        };
        Ok(resource)
    }
}

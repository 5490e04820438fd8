// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Network interface of a node.

use uuid::Uuid;

use super::base::{self, Component, Core, O_COMPONENT};
use super::ip::IP;
use crate::decoder::DecodeContext;
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{PropertyDefinition, PropertyOptions, Registry, ResourceType, TypeRef};
use crate::resource::Resource;
use crate::value::Value;
use crate::xml::Element;

pub static INTERFACE: ResourceType = ResourceType::derive("Interface", &O_COMPONENT);

pub(super) fn declare(registry: &Registry) {
    registry.declare(&INTERFACE, "role", PropertyOptions::new().attribute());
    registry.declare(&INTERFACE, "mac", PropertyOptions::new().attribute());
    registry.declare(&INTERFACE, "ip", PropertyOptions::new().inline().resource(&IP));
}

#[derive(Debug, Clone)]
pub struct Interface {
    core: Core,
    component: Component,
    role: Option<String>,
    mac: Option<String>,
    ip: Option<Uuid>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(Core::new(name))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            component: Component::default(),
            role: None,
            mac: None,
            ip: None,
        }
    }

    pub fn with_urn(mut self, urn: Gurn) -> Self {
        self.core.set_urn(urn);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    pub fn with_ip(mut self, ip: Uuid) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn ip(&self) -> Option<Uuid> {
        self.ip
    }
}

impl Resource for Interface {
    fn resource_type(&self) -> TypeRef {
        &INTERFACE
    }

    fn identity(&self) -> Uuid {
        self.core.identity()
    }

    fn name(&self) -> Option<&str> {
        self.core.name()
    }

    fn urn(&self) -> Option<&Gurn> {
        self.core.urn()
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "role" => self.role.clone().map(Value::String),
            "mac" => self.mac.clone().map(Value::String),
            "ip" => self.ip.map(Value::Ref),
            other => self.core.get(other).or_else(|| self.component.get(other)),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "role" => self.role = Some(value.to_string()),
            "mac" => self.mac = Some(value.to_string()),
            "ip" => self.ip = Some(base::reference(&INTERFACE, property, &value)?),
            other => {
                if !self.core.set(other, value.clone())?
                    && !self.component.set(&INTERFACE, other, value)?
                {
                    return Err(base::unknown_property(&INTERFACE, other));
                }
            }
        }
        Ok(())
    }

    fn decode_property(
        &mut self,
        def: &PropertyDefinition,
        element: &Element,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<bool> {
        if def.name != "ip" {
            return Ok(false);
        }
        let tag = ctx.registry().tag_name(&IP);
        if let Some(child) = element.children_named(&tag).next() {
            let urn = self.core.owned_urn(child, "ip", "ip");
            self.ip = Some(ctx.decode_owned(child, &IP, urn)?);
        }
        Ok(true)
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let ip = Uuid::new_v4();
        let iface = Interface::new("node1:if0")
            .with_role("control_network")
            .with_mac("00:03:1D:0D:4B:96")
            .with_ip(ip);
        assert_eq!(iface.get("role"), Some(Value::from("control_network")));
        assert_eq!(iface.get("mac"), Some(Value::from("00:03:1D:0D:4B:96")));
        assert_eq!(iface.get("ip"), Some(Value::Ref(ip)));
        assert_eq!(iface.get("component_id"), None);
    }

    #[test]
    fn test_ip_must_be_reference() {
        let mut iface = Interface::new("if0");
        assert!(iface.set("ip", Value::Integer(4)).is_err());
        assert!(iface.set("ip", Value::Ref(Uuid::new_v4())).is_ok());
    }
}

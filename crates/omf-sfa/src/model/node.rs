// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Testbed node.

use uuid::Uuid;

use super::base::{self, Component, Core, O_COMPONENT};
use super::cmc::CMC;
use super::interface::INTERFACE;
use super::lease::LEASE;
use crate::decoder::DecodeContext;
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{
    Primitive, PropertyDefinition, PropertyOptions, Registry, ResourceType, TypeRef,
};
use crate::resource::Resource;
use crate::value::Value;
use crate::xml::Element;

pub static NODE: ResourceType = ResourceType::derive("Node", &O_COMPONENT);

pub(super) fn declare(registry: &Registry) {
    registry.declare(&NODE, "hardware_type", PropertyOptions::new().attr_value("name"));
    registry.declare(
        &NODE,
        "available",
        PropertyOptions::new()
            .attr_value("now")
            .primitive(Primitive::Boolean),
    );
    registry.declare(
        &NODE,
        "interfaces",
        PropertyOptions::new().multi().resource(&INTERFACE),
    );
    registry.declare(
        &NODE,
        "leases",
        PropertyOptions::new().inline().multi().resource(&LEASE),
    );
    registry.declare(&NODE, "cmc", PropertyOptions::new().inline().resource(&CMC));
}

#[derive(Debug, Clone)]
pub struct Node {
    core: Core,
    component: Component,
    hardware_type: Option<String>,
    available: Option<bool>,
    interfaces: Vec<Uuid>,
    leases: Vec<Uuid>,
    cmc: Option<Uuid>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(Core::new(name))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            component: Component::default(),
            hardware_type: None,
            available: None,
            interfaces: Vec::new(),
            leases: Vec::new(),
            cmc: None,
        }
    }

    pub fn with_urn(mut self, urn: Gurn) -> Self {
        self.core.set_urn(urn);
        self
    }

    pub fn with_hardware_type(mut self, hardware_type: impl Into<String>) -> Self {
        self.hardware_type = Some(hardware_type.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn add_interface(&mut self, id: Uuid) {
        if !self.interfaces.contains(&id) {
            self.interfaces.push(id);
        }
    }

    pub fn add_lease(&mut self, id: Uuid) {
        if !self.leases.contains(&id) {
            self.leases.push(id);
        }
    }

    pub fn set_cmc(&mut self, id: Uuid) {
        self.cmc = Some(id);
    }

    pub fn interfaces(&self) -> &[Uuid] {
        &self.interfaces
    }

    pub fn leases(&self) -> &[Uuid] {
        &self.leases
    }

    pub fn cmc(&self) -> Option<Uuid> {
        self.cmc
    }

    /// Interfaces appear wrapped in `<interfaces>` or, as in GENI request
    /// documents, as bare `<interface>` children.
    fn decode_interfaces(
        &mut self,
        def: &PropertyDefinition,
        el: &Element,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<()> {
        let mut ids = ctx.decode_wrapped(el, def)?;
        ids.extend(ctx.decode_children_of_type(el, &INTERFACE)?);
        if !ids.is_empty() {
            self.interfaces = ids;
        }
        Ok(())
    }

    fn decode_leases(&mut self, el: &Element, ctx: &mut DecodeContext<'_>) -> Result<()> {
        let tag = ctx.registry().tag_name(&LEASE);
        let mut ids = Vec::new();
        for (i, child) in el.children_named(&tag).enumerate() {
            let suffix = child
                .attr("client_id")
                .map(str::to_string)
                .unwrap_or_else(|| format!("lease{}", i));
            let urn = self.core.owned_urn(child, &suffix, "lease");
            ids.push(ctx.decode_owned(child, &LEASE, urn)?);
        }
        if !ids.is_empty() {
            self.leases = ids;
        }
        Ok(())
    }

    fn decode_cmc(&mut self, el: &Element, ctx: &mut DecodeContext<'_>) -> Result<()> {
        let tag = ctx.registry().tag_name(&CMC);
        if let Some(child) = el.children_named(&tag).next() {
            let urn = self.core.owned_urn(child, "cmc", "cmc");
            self.cmc = Some(ctx.decode_owned(child, &CMC, urn)?);
        }
        Ok(())
    }
}

impl Resource for Node {
    fn resource_type(&self) -> TypeRef {
        &NODE
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
            "hardware_type" => self.hardware_type.clone().map(Value::String),
            "available" => self.available.map(Value::Boolean),
            "interfaces" => base::ref_list(&self.interfaces),
            "leases" => base::ref_list(&self.leases),
            "cmc" => self.cmc.map(Value::Ref),
            other => self.core.get(other).or_else(|| self.component.get(other)),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "hardware_type" => self.hardware_type = Some(value.to_string()),
            "available" => self.available = Some(base::boolean(&NODE, property, &value)?),
            "interfaces" => base::assign_refs(&NODE, property, &mut self.interfaces, value)?,
            "leases" => base::assign_refs(&NODE, property, &mut self.leases, value)?,
            "cmc" => self.cmc = Some(base::reference(&NODE, property, &value)?),
            other => {
                if !self.core.set(other, value.clone())?
                    && !self.component.set(&NODE, other, value)?
                {
                    return Err(base::unknown_property(&NODE, other));
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
        match def.name.as_str() {
            "interfaces" => self.decode_interfaces(def, element, ctx)?,
            "leases" => self.decode_leases(element, ctx)?,
            "cmc" => self.decode_cmc(element, ctx)?,
            _ => return Ok(false),
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
        let mut node = Node::new("node1").with_hardware_type("pc").with_available(true);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        node.add_interface(a);
        node.set("interfaces", Value::Ref(b)).unwrap();

        assert_eq!(node.get("name"), Some(Value::from("node1")));
        assert_eq!(node.get("hardware_type"), Some(Value::from("pc")));
        assert_eq!(node.get("available"), Some(Value::Boolean(true)));
        assert_eq!(node.interfaces(), &[a, b]);
        assert_eq!(node.get("leases"), None);
        assert_eq!(node.get("cmc"), None);
    }

    #[test]
    fn test_component_properties() {
        let mut node = Node::new("node1");
        node.set("exclusive", "true".into()).unwrap();
        node.set("component_manager_id", "urn:publicid:IDN+tb+authority+am".into())
            .unwrap();
        assert_eq!(node.get("exclusive"), Some(Value::Boolean(true)));
        assert!(node.get("component_manager_id").is_some());
        assert!(node.set("exclusive", "maybe".into()).is_err());
    }

    #[test]
    fn test_unknown_property() {
        let mut node = Node::new("node1");
        assert!(node.set("colour", "red".into()).is_err());
        assert!(node.get("colour").is_none());
    }
}

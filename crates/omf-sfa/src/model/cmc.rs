// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chassis manager card: out-of-band power control of one node.
//!
//! A CMC points back at its node, so `Node -> cmc -> node` forms a cycle in
//! every encoded document that contains both.

use uuid::Uuid;

use super::base::{self, Component, Core, O_COMPONENT};
use super::ip::IP;
use super::node::NODE;
use crate::decoder::DecodeContext;
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{PropertyDefinition, PropertyOptions, Registry, ResourceType, TypeRef};
use crate::resource::Resource;
use crate::value::Value;
use crate::xml::Element;

pub static CMC: ResourceType = ResourceType::derive("Cmc", &O_COMPONENT);

pub(super) fn declare(registry: &Registry) {
    registry.declare(&CMC, "ip", PropertyOptions::new().inline().resource(&IP));
    registry.declare(&CMC, "node", PropertyOptions::new().resource(&NODE));
}

#[derive(Debug, Clone)]
pub struct Cmc {
    core: Core,
    component: Component,
    ip: Option<Uuid>,
    node: Option<Uuid>,
}

impl Cmc {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(Core::new(name))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            component: Component::default(),
            ip: None,
            node: None,
        }
    }

    pub fn with_urn(mut self, urn: Gurn) -> Self {
        self.core.set_urn(urn);
        self
    }

    pub fn with_ip(mut self, ip: Uuid) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn with_node(mut self, node: Uuid) -> Self {
        self.node = Some(node);
        self
    }

    pub fn ip(&self) -> Option<Uuid> {
        self.ip
    }

    pub fn node(&self) -> Option<Uuid> {
        self.node
    }
}

impl Resource for Cmc {
    fn resource_type(&self) -> TypeRef {
        &CMC
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
            "ip" => self.ip.map(Value::Ref),
            "node" => self.node.map(Value::Ref),
            other => self.core.get(other).or_else(|| self.component.get(other)),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "ip" => self.ip = Some(base::reference(&CMC, property, &value)?),
            "node" => self.node = Some(base::reference(&CMC, property, &value)?),
            other => {
                if !self.core.set(other, value.clone())?
                    && !self.component.set(&CMC, other, value)?
                {
                    return Err(base::unknown_property(&CMC, other));
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

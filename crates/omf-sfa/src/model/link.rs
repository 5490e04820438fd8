// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Link between interfaces.

use uuid::Uuid;

use super::base::{self, Component, Core, O_COMPONENT};
use super::interface::INTERFACE;
use crate::decoder::DecodeContext;
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{PropertyDefinition, PropertyOptions, Registry, ResourceType, TypeRef};
use crate::resource::Resource;
use crate::value::Value;
use crate::xml::Element;

pub static LINK: ResourceType = ResourceType::derive("Link", &O_COMPONENT);

pub(super) fn declare(registry: &Registry) {
    registry.declare(&LINK, "link_type", PropertyOptions::new().attr_value("name"));
    registry.declare(
        &LINK,
        "interfaces",
        PropertyOptions::new().multi().resource(&INTERFACE),
    );
}

#[derive(Debug, Clone)]
pub struct Link {
    core: Core,
    component: Component,
    link_type: Option<String>,
    interfaces: Vec<Uuid>,
}

impl Link {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(Core::new(name))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            component: Component::default(),
            link_type: None,
            interfaces: Vec::new(),
        }
    }

    pub fn with_link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    pub fn add_interface(&mut self, id: Uuid) {
        if !self.interfaces.contains(&id) {
            self.interfaces.push(id);
        }
    }

    pub fn interfaces(&self) -> &[Uuid] {
        &self.interfaces
    }
}

impl Resource for Link {
    fn resource_type(&self) -> TypeRef {
        &LINK
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
            "link_type" => self.link_type.clone().map(Value::String),
            "interfaces" => base::ref_list(&self.interfaces),
            other => self.core.get(other).or_else(|| self.component.get(other)),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "link_type" => self.link_type = Some(value.to_string()),
            "interfaces" => base::assign_refs(&LINK, property, &mut self.interfaces, value)?,
            other => {
                if !self.core.set(other, value.clone())?
                    && !self.component.set(&LINK, other, value)?
                {
                    return Err(base::unknown_property(&LINK, other));
                }
            }
        }
        Ok(())
    }

    /// Wrapped interface elements, plus GENI `<interface_ref>` children
    /// pointing at interfaces known to the session or the store.
    fn decode_property(
        &mut self,
        def: &PropertyDefinition,
        element: &Element,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<bool> {
        if def.name != "interfaces" {
            return Ok(false);
        }
        let mut ids = ctx.decode_wrapped(element, def)?;
        for iref in element.children_named("interface_ref") {
            match ctx.resolve_reference(iref) {
                Some(id) => ids.push(id),
                None => log::warn!(
                    "[link] {}: unresolved interface_ref {:?}",
                    self.core.name().unwrap_or("?"),
                    iref.attr("component_id")
                ),
            }
        }
        if !ids.is_empty() {
            self.interfaces = ids;
        }
        Ok(true)
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

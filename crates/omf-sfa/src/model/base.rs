// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Root types and the state every model resource shares.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CodecError, Result};
use crate::gurn::Gurn;
use crate::registry::{Primitive, PropertyOptions, Registry, ResourceType, TypeRef};
use crate::value::Value;
use crate::xml::Element;

/// Root of the resource hierarchy.
pub static O_RESOURCE: ResourceType = ResourceType::root("OResource");

/// Physical or virtual component managed by the AM.
pub static O_COMPONENT: ResourceType = ResourceType::derive("OComponent", &O_RESOURCE);

/// Domain used for URNs derived from resources that have none.
pub const LOCAL_DOMAIN: &str = "local";

pub(super) fn declare(registry: &Registry, domain: &str) {
    registry.declare(&O_RESOURCE, "name", PropertyOptions::new().attribute());

    registry.declare(&O_COMPONENT, "component_id", PropertyOptions::new().attribute());
    registry.declare(
        &O_COMPONENT,
        "component_manager_id",
        PropertyOptions::new()
            .attribute()
            .default_value(authority_urn(domain).to_string()),
    );
    registry.declare(
        &O_COMPONENT,
        "exclusive",
        PropertyOptions::new().attribute().primitive(Primitive::Boolean),
    );
}

/// URN of the aggregate manager authority for `domain`.
pub fn authority_urn(domain: &str) -> Gurn {
    Gurn::create("am", domain, "authority")
}

/// Identity, name and URN.
#[derive(Debug, Clone)]
pub struct Core {
    identity: Uuid,
    name: Option<String>,
    urn: Option<Gurn>,
}

impl Core {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            identity: Uuid::new_v4(),
            name: Some(name.into()),
            urn: None,
        }
    }

    /// Core named after `urn`, reusing its identity fragment when present.
    pub fn from_urn(urn: &Gurn) -> Self {
        Self {
            identity: urn.identity().unwrap_or_else(Uuid::new_v4),
            name: Some(urn.short_name().to_string()),
            urn: Some(urn.clone()),
        }
    }

    pub fn identity(&self) -> Uuid {
        self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn urn(&self) -> Option<&Gurn> {
        self.urn.as_ref()
    }

    pub fn set_urn(&mut self, urn: Gurn) {
        self.urn = Some(urn);
    }

    /// URN for a resource owned by this one (an interface's IP, a node's
    /// CMC), used when the owned element carries no identity of its own.
    ///
    /// An `id` attribute holding a UUID becomes the identity fragment.
    pub fn owned_urn(&self, el: &Element, suffix: &str, type_name: &str) -> Gurn {
        let (short, domain) = match &self.urn {
            Some(urn) => (format!("{}:{}", urn.short_name(), suffix), urn.domain().to_string()),
            None => (format!("{}:{}", self.identity, suffix), LOCAL_DOMAIN.to_string()),
        };
        let urn = Gurn::create(short, domain, type_name);
        match el.attr("id").and_then(|id| Uuid::parse_str(id).ok()) {
            Some(id) => urn.with_identity(id),
            None => urn,
        }
    }

    pub(crate) fn get(&self, property: &str) -> Option<Value> {
        match property {
            "name" => self.name.clone().map(Value::String),
            "component_id" => self.urn.as_ref().map(|u| Value::String(u.to_string())),
            _ => None,
        }
    }

    /// Returns `Ok(false)` for properties not held here.
    pub(crate) fn set(&mut self, property: &str, value: Value) -> Result<bool> {
        match property {
            "name" => self.name = Some(value.to_string()),
            "component_id" => {
                let urn = Gurn::parse(&value.to_string())
                    .map_err(|e| CodecError::consistency(format!("component_id: {}", e)))?;
                self.urn = Some(urn);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Properties added by [`O_COMPONENT`].
#[derive(Debug, Clone, Default)]
pub struct Component {
    manager: Option<String>,
    exclusive: Option<bool>,
}

impl Component {
    pub(crate) fn get(&self, property: &str) -> Option<Value> {
        match property {
            "component_manager_id" => self.manager.clone().map(Value::String),
            "exclusive" => self.exclusive.map(Value::Boolean),
            _ => None,
        }
    }

    pub(crate) fn set(&mut self, ty: TypeRef, property: &str, value: Value) -> Result<bool> {
        match property {
            "component_manager_id" => self.manager = Some(value.to_string()),
            "exclusive" => self.exclusive = Some(boolean(ty, property, &value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// ----------------------------------------------------------------------------
// Value helpers shared by the model types
// ----------------------------------------------------------------------------

pub(crate) fn unknown_property(ty: TypeRef, property: &str) -> CodecError {
    CodecError::consistency(format!("{:?} has no property '{}'", ty, property))
}

fn mismatch(ty: TypeRef, property: &str, value: &Value, expected: &str) -> CodecError {
    CodecError::consistency(format!(
        "{:?}.{}: '{}' is not a {}",
        ty, property, value, expected
    ))
}

pub(crate) fn boolean(ty: TypeRef, property: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(mismatch(ty, property, other, "boolean")),
    }
}

pub(crate) fn time(ty: TypeRef, property: &str, value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::Time(t) => Ok(*t),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| mismatch(ty, property, value, "timestamp")),
        other => Err(mismatch(ty, property, other, "timestamp")),
    }
}

pub(crate) fn reference(ty: TypeRef, property: &str, value: &Value) -> Result<Uuid> {
    match value {
        Value::Ref(id) => Ok(*id),
        Value::String(s) => {
            Uuid::parse_str(s).map_err(|_| mismatch(ty, property, value, "resource reference"))
        }
        other => Err(mismatch(ty, property, other, "resource reference")),
    }
}

/// Multi-valued reference assignment: a list replaces, a single value appends.
pub(crate) fn assign_refs(
    ty: TypeRef,
    property: &str,
    target: &mut Vec<Uuid>,
    value: Value,
) -> Result<()> {
    match value {
        Value::List(items) => {
            *target = items
                .iter()
                .map(|item| reference(ty, property, item))
                .collect::<Result<Vec<_>>>()?;
        }
        single => {
            let id = reference(ty, property, &single)?;
            if !target.contains(&id) {
                target.push(id);
            }
        }
    }
    Ok(())
}

pub(crate) fn ref_list(ids: &[Uuid]) -> Option<Value> {
    if ids.is_empty() {
        None
    } else {
        Some(Value::List(ids.iter().copied().map(Value::Ref).collect()))
    }
}

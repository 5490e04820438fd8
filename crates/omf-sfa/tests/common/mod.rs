// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for the codec integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use omf_sfa::model::{self, Interface, Node};
use omf_sfa::{
    CodecError, Element, Gurn, MemoryStore, Primitive, PropertyOptions, Registry, Resource,
    ResourceFactory, ResourceStore, ResourceType, Result, TypeRef, Value,
};
use uuid::Uuid;

pub const DOMAIN: &str = "testbed";

pub static THING: ResourceType = ResourceType::root("Thing");
pub static RECORD: ResourceType = ResourceType::derive("Record", &THING);

/// Generic resource keeping its properties in a map.
#[derive(Debug, Clone)]
pub struct Record {
    id: Uuid,
    name: Option<String>,
    urn: Option<Gurn>,
    href: Option<String>,
    props: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            urn: Some(Gurn::create(name, DOMAIN, "record")),
            href: None,
            props: BTreeMap::new(),
        }
    }

    pub fn with(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.props.insert(property.to_string(), value.into());
        self
    }

    /// Force the href path below the prefix.
    pub fn with_href(mut self, path: &str) -> Self {
        self.href = Some(path.to_string());
        self
    }
}

impl Resource for Record {
    fn resource_type(&self) -> TypeRef {
        &RECORD
    }

    fn identity(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn urn(&self) -> Option<&Gurn> {
        self.urn.as_ref()
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "name" => self.name.clone().map(Value::String),
            "component_id" => self.urn.as_ref().map(|u| Value::String(u.to_string())),
            other => self.props.get(other).cloned(),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "name" => self.name = Some(value.to_string()),
            "component_id" => {
                let urn = Gurn::parse(&value.to_string())
                    .map_err(|e| CodecError::Consistency(e.to_string()))?;
                self.urn = Some(urn);
            }
            other => {
                self.props.insert(other.to_string(), value);
            }
        }
        Ok(())
    }

    fn href(&self, prefix: &str) -> String {
        match &self.href {
            Some(path) => format!("{}/{}", prefix, path),
            None => format!("{}/{}", prefix, self.id),
        }
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

pub struct RecordFactory;

impl ResourceFactory for RecordFactory {
    fn instantiate(&self, ty: TypeRef, urn: &Gurn) -> Result<Box<dyn Resource>> {
        if *ty != RECORD {
            return Err(CodecError::Schema(format!("cannot build {:?}", ty)));
        }
        let mut record = Record::new(urn.short_name());
        record.urn = Some(urn.clone());
        if let Some(id) = urn.identity() {
            record.id = id;
        }
        Ok(Box::new(record))
    }
}

/// Registry with the `Record` fixture type.
pub fn record_registry() -> Registry {
    let registry = Registry::new();
    registry
        .register_namespace("omf", omf_sfa::OMF_NAMESPACE_URI)
        .unwrap();
    registry.register_type(&RECORD, "record", None).unwrap();

    registry.declare(&THING, "name", PropertyOptions::new().attribute());
    registry.declare(&THING, "component_id", PropertyOptions::new().attribute());
    registry.declare(&RECORD, "label", PropertyOptions::new());
    registry.declare(
        &RECORD,
        "count",
        PropertyOptions::new().attribute().primitive(Primitive::Integer),
    );
    registry.declare(
        &RECORD,
        "flag",
        PropertyOptions::new().primitive(Primitive::Boolean),
    );
    registry.declare(&RECORD, "peer", PropertyOptions::new().resource(&RECORD));
    registry.declare(
        &RECORD,
        "peers",
        PropertyOptions::new().multi().resource(&RECORD),
    );
    registry.declare(&RECORD, "_secret", PropertyOptions::new());
    registry
}

/// Registry with the standard model.
pub fn model_registry() -> Registry {
    let registry = Registry::new();
    model::register(&registry, DOMAIN).unwrap();
    registry
}

pub fn urn(short: &str, ty: &str) -> Gurn {
    Gurn::create(short, DOMAIN, ty)
}

/// Saves `node1` with interfaces `if0` and `if1`; returns the node.
pub fn seed_node(store: &MemoryStore) -> std::sync::Arc<dyn Resource> {
    let if0 = Interface::new("if0")
        .with_urn(urn("node1:if0", "interface"))
        .with_role("control_network");
    let if1 = Interface::new("if1")
        .with_urn(urn("node1:if1", "interface"))
        .with_role("cm_network");

    let mut node = Node::new("node1")
        .with_urn(urn("node1", "node"))
        .with_hardware_type("pc");
    node.add_interface(if0.identity());
    node.add_interface(if1.identity());

    store.save(Box::new(if0)).unwrap();
    store.save(Box::new(if1)).unwrap();
    store.save(Box::new(node)).unwrap()
}

/// Every element in the tree, depth first.
pub fn descendants(root: &Element) -> Vec<&Element> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(el) = stack.pop() {
        out.push(el);
        let children: Vec<&Element> = el.children().collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Names of the resources referenced by `value`.
pub fn ref_names(store: &MemoryStore, value: Option<Value>) -> Vec<String> {
    value
        .map(|v| v.items().to_vec())
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_ref_id)
        .filter_map(|id| store.find_by_identity(id))
        .filter_map(|r| r.name().map(str::to_string))
        .collect()
}

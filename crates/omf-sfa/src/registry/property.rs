// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative property definitions and the merged-definition cache.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::types::{TypeRef, TypeRegistry};
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Properties whose name starts with this marker are never serialized.
pub const RESERVED_MARKER: char = '_';

/// How a property value is rendered in markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Representation {
    /// Attribute on the resource element.
    Attribute,
    /// Child element carrying the value in the named attribute.
    AttrValue(String),
    /// Spliced directly into the resource element, no wrapper.
    Inline,
    /// Child element(s) named after the property.
    #[default]
    Element,
}

/// Scalar type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    #[default]
    String,
    Integer,
    Boolean,
    /// ISO-8601 timestamp.
    Time,
}

/// Declared type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Primitive(Primitive),
    /// Reference(s) to resources of this type.
    Resource(TypeRef),
}

impl Default for TypeTag {
    fn default() -> Self {
        TypeTag::Primitive(Primitive::String)
    }
}

/// Options accepted by [`Registry::declare`](crate::Registry::declare).
///
/// ```
/// use omf_sfa::{Primitive, PropertyOptions};
///
/// let opts = PropertyOptions::new().attribute().primitive(Primitive::Boolean);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    namespace: Option<String>,
    representation: Representation,
    multi_valued: bool,
    default: Option<Value>,
    accessor: Option<String>,
    type_tag: TypeTag,
    max_depth: Option<u32>,
}

impl PropertyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualify the markup name with a registered namespace prefix.
    pub fn namespace(mut self, prefix: impl Into<String>) -> Self {
        self.namespace = Some(prefix.into());
        self
    }

    pub fn attribute(mut self) -> Self {
        self.representation = Representation::Attribute;
        self
    }

    pub fn attr_value(mut self, attr_name: impl Into<String>) -> Self {
        self.representation = Representation::AttrValue(attr_name.into());
        self
    }

    pub fn inline(mut self) -> Self {
        self.representation = Representation::Inline;
        self
    }

    pub fn element(mut self) -> Self {
        self.representation = Representation::Element;
        self
    }

    /// May occur multiple times, forming a sequence.
    pub fn multi(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Value substituted when the accessor returns nothing.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Resource accessor backing this property, when it differs from the
    /// markup name.
    pub fn accessor(mut self, name: impl Into<String>) -> Self {
        self.accessor = Some(name.into());
        self
    }

    pub fn primitive(mut self, primitive: Primitive) -> Self {
        self.type_tag = TypeTag::Primitive(primitive);
        self
    }

    pub fn resource(mut self, ty: TypeRef) -> Self {
        self.type_tag = TypeTag::Resource(ty);
        self
    }

    /// Nesting depth beyond which this property may be truncated.
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub(crate) fn into_definition(self, name: &str) -> PropertyDefinition {
        PropertyDefinition {
            name: name.to_string(),
            namespace: self.namespace,
            representation: self.representation,
            multi_valued: self.multi_valued,
            default: self.default,
            accessor: self.accessor,
            type_tag: self.type_tag,
            max_depth: self.max_depth,
        }
    }
}

/// Metadata of one property on one resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub name: String,
    pub namespace: Option<String>,
    pub representation: Representation,
    pub multi_valued: bool,
    pub default: Option<Value>,
    pub accessor: Option<String>,
    pub type_tag: TypeTag,
    pub max_depth: Option<u32>,
}

impl PropertyDefinition {
    /// Name of the resource accessor to read/write.
    pub fn accessor_name(&self) -> &str {
        self.accessor.as_deref().unwrap_or(&self.name)
    }

    pub fn is_reserved(&self) -> bool {
        self.name.starts_with(RESERVED_MARKER)
    }

    /// Cast incoming markup text to this property's type.
    ///
    /// String values are kept verbatim; other types ignore surrounding
    /// whitespace.
    pub fn cast(&self, text: &str) -> Result<Value> {
        let trimmed = text.trim();
        let mismatch = |expected: &str| {
            CodecError::consistency(format!(
                "wrong type for '{}': '{}' is not a {}",
                self.name, trimmed, expected
            ))
        };

        match self.type_tag {
            TypeTag::Primitive(Primitive::String) => Ok(Value::String(text.to_string())),
            TypeTag::Primitive(Primitive::Integer) => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| mismatch("integer")),
            TypeTag::Primitive(Primitive::Boolean) => match trimmed {
                "true" | "1" | "yes" => Ok(Value::Boolean(true)),
                "false" | "0" | "no" => Ok(Value::Boolean(false)),
                _ => Err(mismatch("boolean")),
            },
            TypeTag::Primitive(Primitive::Time) => DateTime::parse_from_rfc3339(trimmed)
                .map(|t| Value::Time(t.with_timezone(&Utc)))
                .map_err(|_| mismatch("timestamp")),
            TypeTag::Resource(ty) => Uuid::parse_str(trimmed)
                .map(Value::Ref)
                .map_err(|_| mismatch(&format!("{:?} identity", ty))),
        }
    }
}

/// Ancestor definitions merged with a type's own, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct PropertyDefinitionSet {
    defs: BTreeMap<String, PropertyDefinition>,
}

impl PropertyDefinitionSet {
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.defs.get(name)
    }

    /// All definitions in name order, reserved ones included.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.defs.values()
    }

    /// Definitions taking part in serialization, in name order.
    pub fn serializable(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.defs.values().filter(|d| !d.is_reserved())
    }

    /// Definition whose accessor is `accessor`.
    pub fn by_accessor(&self, accessor: &str) -> Option<&PropertyDefinition> {
        self.defs.values().find(|d| d.accessor_name() == accessor)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Per-type own definitions plus the cache of merged sets.
///
/// Lock order is always `own` then `merged`: a late [`declare`](Self::declare)
/// cannot interleave with a merge that would re-cache a stale set.
#[derive(Default)]
pub struct PropertyRegistry {
    own: RwLock<HashMap<TypeRef, BTreeMap<String, PropertyDefinition>>>,
    merged: RwLock<HashMap<TypeRef, Arc<PropertyDefinitionSet>>>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a definition on `ty`, dropping the cached sets of
    /// `ty` and every known subtype.
    pub fn declare(&self, types: &TypeRegistry, ty: TypeRef, def: PropertyDefinition) {
        types.note(ty);
        let mut own = self.own.write();
        own.entry(ty).or_default().insert(def.name.clone(), def);

        let mut merged = self.merged.write();
        merged.remove(ty);
        for sub in types.descendants_of(ty) {
            if merged.remove(sub).is_some() {
                log::debug!("[properties] invalidated cached definitions of {:?}", sub);
            }
        }
    }

    /// Merged definitions of `ty`, built and cached on first use.
    pub fn merged_defs(&self, types: &TypeRegistry, ty: TypeRef) -> Arc<PropertyDefinitionSet> {
        if let Some(set) = self.merged.read().get(ty) {
            return Arc::clone(set);
        }

        types.note(ty);
        let own = self.own.read();
        let mut chain: Vec<TypeRef> = ty.ancestors().collect();
        chain.reverse();
        chain.push(ty);

        let mut defs = BTreeMap::new();
        for t in chain {
            if let Some(props) = own.get(t) {
                for (name, def) in props {
                    defs.insert(name.clone(), def.clone());
                }
            }
        }

        let set = Arc::new(PropertyDefinitionSet { defs });
        self.merged.write().insert(ty, Arc::clone(&set));
        set
    }
}

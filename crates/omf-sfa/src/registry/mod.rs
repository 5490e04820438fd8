// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide codec registry.
//!
//! Holds the three registration tables the codec consults:
//!
//! ```text
//! Registry
//! +-- NamespaceRegistry   prefix <-> URI (append-only)
//! +-- TypeRegistry        tag <-> ResourceType, subtype index
//! +-- PropertyRegistry    per-type definitions, merged-set cache
//! ```
//!
//! Populate it once at startup (see [`crate::model::register`]) and share it
//! by reference or `Arc`. Each table sits behind its own lock, so reads from
//! concurrent encode/decode calls never block each other and a late
//! [`declare`](Registry::declare) is safe while requests are in flight.

mod namespace;
mod property;
mod types;

pub use namespace::NamespaceRegistry;
pub use property::{
    Primitive, PropertyDefinition, PropertyDefinitionSet, PropertyOptions, PropertyRegistry,
    Representation, TypeTag, RESERVED_MARKER,
};
pub use types::{ResourceType, TypeRef, TypeRegistry};

use std::sync::Arc;

use crate::error::Result;

/// Namespace, type and property tables behind one handle.
#[derive(Default)]
pub struct Registry {
    namespaces: NamespaceRegistry,
    types: TypeRegistry,
    properties: PropertyRegistry,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_namespace(&self, prefix: &str, uri: &str) -> Result<()> {
        self.namespaces.register(prefix, uri)
    }

    /// Bind `ty` to `tag`, qualified by `prefix` when given.
    pub fn register_type(&self, ty: TypeRef, tag: &str, prefix: Option<&str>) -> Result<()> {
        let qualified = self.namespaces.qualify(tag, prefix)?;
        self.types.register(ty, &qualified)
    }

    /// Type registered under a (qualified) tag.
    pub fn resolve_type(&self, tag: &str) -> Option<TypeRef> {
        self.types.resolve(tag)
    }

    /// Element name used for resources of `ty`.
    ///
    /// Falls back to the descriptor name for types without a registered tag.
    pub fn tag_name(&self, ty: TypeRef) -> String {
        self.types
            .tag_of(ty)
            .unwrap_or_else(|| ty.name().to_string())
    }

    pub fn qualify(&self, name: &str, prefix: Option<&str>) -> Result<String> {
        self.namespaces.qualify(name, prefix)
    }

    /// Markup name of a property definition.
    pub fn qualified_name(&self, def: &PropertyDefinition) -> Result<String> {
        self.namespaces.qualify(&def.name, def.namespace.as_deref())
    }

    /// Declare (or redeclare) property `name` on `ty`.
    pub fn declare(&self, ty: TypeRef, name: &str, options: PropertyOptions) {
        self.properties
            .declare(&self.types, ty, options.into_definition(name));
    }

    /// Definitions of `ty` merged with those of all its ancestors.
    pub fn merged_defs(&self, ty: TypeRef) -> Arc<PropertyDefinitionSet> {
        self.properties.merged_defs(&self.types, ty)
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    static ROOT: ResourceType = ResourceType::root("Root");
    static THING: ResourceType = ResourceType::derive("Thing", &ROOT);

    #[test]
    fn test_register_type_with_prefix() {
        let registry = Registry::new();
        registry.register_namespace("ol", "urn:ol").unwrap();
        registry.register_type(&THING, "thing", Some("ol")).unwrap();

        assert_eq!(registry.resolve_type("ol:thing"), Some(&THING));
        assert_eq!(registry.tag_name(&THING), "ol:thing");
        assert_eq!(registry.tag_name(&ROOT), "Root");
    }

    #[test]
    fn test_register_type_unknown_prefix() {
        let registry = Registry::new();
        let err = registry
            .register_type(&THING, "thing", Some("nope"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(registry.resolve_type("thing"), None);
    }

    #[test]
    fn test_late_declaration_reaches_cached_subtype() {
        let registry = Registry::new();
        registry.declare(&THING, "size", PropertyOptions::new().attribute());
        assert!(registry.merged_defs(&THING).get("colour").is_none());

        registry.declare(&ROOT, "colour", PropertyOptions::new().attribute());
        let defs = registry.merged_defs(&THING);
        assert!(defs.get("colour").is_some());
        assert!(defs.get("size").is_some());
    }
}

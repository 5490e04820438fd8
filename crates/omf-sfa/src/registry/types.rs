// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resource type descriptors and the tag <-> type table.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;

use crate::error::{CodecError, Result};

/// Handle to a resource type descriptor.
pub type TypeRef = &'static ResourceType;

/// Compile-time descriptor of a resource type.
///
/// Descriptors live in statics and link to their parent, forming a
/// single-rooted hierarchy:
///
/// ```
/// use omf_sfa::ResourceType;
///
/// static BASE: ResourceType = ResourceType::root("Base");
/// static LEAF: ResourceType = ResourceType::derive("Leaf", &BASE);
///
/// assert!(LEAF.is_subtype_of(&BASE));
/// ```
pub struct ResourceType {
    name: &'static str,
    parent: Option<TypeRef>,
}

impl ResourceType {
    /// Root of a hierarchy.
    pub const fn root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// Direct subtype of `parent`.
    pub const fn derive(name: &'static str, parent: TypeRef) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<TypeRef> {
        self.parent
    }

    /// Ancestors, nearest first (excluding `self`).
    pub fn ancestors(&self) -> impl Iterator<Item = TypeRef> {
        std::iter::successors(self.parent, |t| t.parent)
    }

    /// Strict subtype test.
    pub fn is_subtype_of(&self, other: &ResourceType) -> bool {
        self.ancestors().any(|a| a == other)
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceType {}

impl Hash for ResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Default)]
struct TypeTables {
    tags: HashMap<TypeRef, String>,
    by_tag: HashMap<String, TypeRef>,
    /// ancestor -> every known type below it
    descendants: HashMap<TypeRef, HashSet<TypeRef>>,
}

/// Bidirectional tag <-> type table plus the subtype index used for
/// property cache invalidation.
#[derive(Default)]
pub struct TypeRegistry {
    inner: RwLock<TypeTables>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `ty` to an already-qualified tag name.
    pub fn register(&self, ty: TypeRef, tag: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(existing) = inner.by_tag.get(tag) {
            if *existing != ty {
                return Err(CodecError::config(format!(
                    "tag '{}' already mapped to {:?}, refusing {:?}",
                    tag, existing, ty
                )));
            }
        }
        if let Some(existing) = inner.tags.get(ty) {
            if existing != tag {
                return Err(CodecError::config(format!(
                    "{:?} already registered as '{}', refusing '{}'",
                    ty, existing, tag
                )));
            }
        }
        inner.tags.insert(ty, tag.to_string());
        inner.by_tag.insert(tag.to_string(), ty);
        Self::index(&mut inner, ty);
        Ok(())
    }

    /// Record `ty` in the subtype index of all its ancestors.
    pub fn note(&self, ty: TypeRef) {
        let known = {
            let inner = self.inner.read();
            ty.parent()
                .map(|p| inner.descendants.get(p).is_some_and(|d| d.contains(ty)))
                .unwrap_or(true)
        };
        if !known {
            Self::index(&mut self.inner.write(), ty);
        }
    }

    // Intermediate ancestors are known types too, so the whole chain is indexed.
    fn index(inner: &mut TypeTables, ty: TypeRef) {
        let mut current = Some(ty);
        while let Some(t) = current {
            for ancestor in t.ancestors() {
                inner.descendants.entry(ancestor).or_default().insert(t);
            }
            current = t.parent();
        }
    }

    pub fn resolve(&self, tag: &str) -> Option<TypeRef> {
        self.inner.read().by_tag.get(tag).copied()
    }

    pub fn tag_of(&self, ty: TypeRef) -> Option<String> {
        self.inner.read().tags.get(ty).cloned()
    }

    /// Every known type below `ty`.
    pub fn descendants_of(&self, ty: TypeRef) -> Vec<TypeRef> {
        self.inner
            .read()
            .descendants
            .get(ty)
            .map(|d| d.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.inner.read().by_tag.keys().cloned().collect();
        tags.sort();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: ResourceType = ResourceType::root("Base");
    static MIDDLE: ResourceType = ResourceType::derive("Middle", &BASE);
    static LEAF: ResourceType = ResourceType::derive("Leaf", &MIDDLE);
    static OTHER: ResourceType = ResourceType::derive("Other", &BASE);

    #[test]
    fn test_ancestors() {
        let names: Vec<&str> = LEAF.ancestors().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Middle", "Base"]);
        assert!(LEAF.is_subtype_of(&BASE));
        assert!(!BASE.is_subtype_of(&LEAF));
        assert!(!LEAF.is_subtype_of(&LEAF));
    }

    #[test]
    fn test_register_and_resolve() {
        let types = TypeRegistry::new();
        types.register(&LEAF, "leaf").unwrap();

        assert_eq!(types.resolve("leaf"), Some(&LEAF));
        assert_eq!(types.tag_of(&LEAF), Some("leaf".to_string()));
        assert_eq!(types.resolve("missing"), None);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let types = TypeRegistry::new();
        types.register(&LEAF, "leaf").unwrap();
        types.register(&LEAF, "leaf").unwrap();
        assert!(types.register(&OTHER, "leaf").is_err());
        assert!(types.register(&LEAF, "leaf2").is_err());
    }

    #[test]
    fn test_subtype_index() {
        let types = TypeRegistry::new();
        types.register(&LEAF, "leaf").unwrap();
        types.note(&OTHER);

        let mut below_base: Vec<&str> = types
            .descendants_of(&BASE)
            .iter()
            .map(|t| t.name())
            .collect();
        below_base.sort();
        assert_eq!(below_base, vec!["Leaf", "Middle", "Other"]);
        assert!(types.descendants_of(&LEAF).is_empty());
    }
}

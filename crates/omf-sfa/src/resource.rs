// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resource contract and the collaborators the codec consumes.
//!
//! The codec never reflects on resource implementations. Each resource type
//! exposes its properties through [`Resource::get`] / [`Resource::set`] keyed
//! by accessor name, matching the definitions declared for its type.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::decoder::DecodeContext;
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{PropertyDefinition, TypeRef};
use crate::value::Value;
use crate::xml::Element;

/// A resource instance as seen by the codec.
///
/// Resources reference each other by identity ([`Value::Ref`]), so object
/// graphs may contain cycles without shared ownership cycles.
pub trait Resource: fmt::Debug + Send + Sync {
    fn resource_type(&self) -> TypeRef;

    /// Globally unique, immutable identity.
    fn identity(&self) -> Uuid;

    fn name(&self) -> Option<&str>;

    /// Global unique resource name.
    fn urn(&self) -> Option<&Gurn>;

    /// Read a property by accessor name. `None` means absent.
    fn get(&self, property: &str) -> Option<Value>;

    /// Assign a property by accessor name.
    ///
    /// Multi-valued properties append single values and replace on
    /// [`Value::List`].
    fn set(&mut self, property: &str, value: Value) -> Result<()>;

    /// Type-specific decode hook for one property.
    ///
    /// Returns `Ok(true)` when the property was handled, in which case the
    /// generic attribute/child assignment is skipped.
    fn decode_property(
        &mut self,
        _def: &PropertyDefinition,
        _element: &Element,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Dereference URL under `prefix`.
    fn href(&self, prefix: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), self.identity())
    }

    fn clone_resource(&self) -> Box<dyn Resource>;
}

impl Clone for Box<dyn Resource> {
    fn clone(&self) -> Self {
        self.clone_resource()
    }
}

/// Persistence collaborator.
///
/// Lookups hand out immutable snapshots; updates go through
/// [`save`](Self::save) with a modified copy.
pub trait ResourceStore: Send + Sync {
    fn find_by_identity(&self, id: Uuid) -> Option<Arc<dyn Resource>>;

    fn find_by_urn(&self, urn: &Gurn) -> Option<Arc<dyn Resource>>;

    /// Persist a new or updated resource.
    fn save(&self, resource: Box<dyn Resource>) -> anyhow::Result<Arc<dyn Resource>>;

    /// Persist a batch. Implementations should make this all-or-nothing.
    fn save_all(
        &self,
        resources: Vec<Box<dyn Resource>>,
    ) -> anyhow::Result<Vec<Arc<dyn Resource>>> {
        resources.into_iter().map(|r| self.save(r)).collect()
    }

    /// All stored resources.
    fn all(&self) -> Vec<Arc<dyn Resource>>;
}

/// Type-construction collaborator used by the decoder.
pub trait ResourceFactory: Send + Sync {
    /// New, unsaved resource of type `ty` named after `urn`'s short name.
    fn instantiate(&self, ty: TypeRef, urn: &Gurn) -> Result<Box<dyn Resource>>;
}

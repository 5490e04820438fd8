// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Markup -> resources.
//!
//! Decoding resolves each element to an existing resource (patched in place)
//! or a new one, populates it from attributes and children, and stages it in
//! a [`DecodeContext`]. Nothing becomes visible in the store until the whole
//! document decoded; the staged batch is then committed through
//! [`ResourceStore::save_all`].
//!
//! Identity resolution order:
//!
//! 1. `uuid` / `idref` / `id` attribute naming a known identity
//! 2. `component_id` GURN (identity fragment, else exact URN match)
//! 3. `sliver_id` + `client_id`, synthesizing `{sliver_short}:{client_id}`
//! 4. otherwise a new resource, typed by the GURN type or the element name

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{CodecError, Result};
use crate::gurn::Gurn;
use crate::registry::{PropertyDefinition, Registry, Representation, TypeRef, TypeTag};
use crate::resource::{Resource, ResourceFactory, ResourceStore};
use crate::value::Value;
use crate::xml::{Document, Element};
use crate::SFA_NAMESPACE_URI;

/// Decoder over a registry, a store and a resource factory.
pub struct Decoder<'a> {
    registry: &'a Registry,
    store: &'a dyn ResourceStore,
    factory: &'a dyn ResourceFactory,
}

impl<'a> Decoder<'a> {
    pub fn new(
        registry: &'a Registry,
        store: &'a dyn ResourceStore,
        factory: &'a dyn ResourceFactory,
    ) -> Self {
        Self {
            registry,
            store,
            factory,
        }
    }

    /// Decode one resource element and persist everything it touched.
    pub fn decode(&self, element: &Element) -> Result<Arc<dyn Resource>> {
        let mut ctx = DecodeContext::new(self);
        let id = ctx.decode_element(element)?;
        let saved = ctx.commit()?;
        self.pick(&saved, id)
    }

    /// Parse and decode a document.
    ///
    /// An `rspec` root decodes each child element within one session;
    /// any other root is decoded as a single resource.
    pub fn decode_document(&self, xml: &str) -> Result<Vec<Arc<dyn Resource>>> {
        let doc = Document::parse(xml)?;
        let root = doc.root();

        let mut ctx = DecodeContext::new(self);
        let ids = if root.local_name() == "rspec" {
            root.children()
                .map(|child| ctx.decode_element(child))
                .collect::<Result<Vec<_>>>()?
        } else {
            vec![ctx.decode_element(root)?]
        };
        let saved = ctx.commit()?;
        ids.into_iter().map(|id| self.pick(&saved, id)).collect()
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    fn pick(&self, saved: &[Arc<dyn Resource>], id: Uuid) -> Result<Arc<dyn Resource>> {
        saved
            .iter()
            .find(|r| r.identity() == id)
            .cloned()
            .or_else(|| self.store.find_by_identity(id))
            .ok_or_else(|| CodecError::consistency(format!("decoded resource {} vanished", id)))
    }
}

enum Target {
    Known(Uuid),
    Create(Gurn),
}

/// State of one decode call.
///
/// Type-specific overrides ([`Resource::decode_property`]) receive the
/// context to decode nested resource elements within the same session.
pub struct DecodeContext<'a> {
    decoder: &'a Decoder<'a>,
    /// document `id` attribute -> identity
    doc_ids: HashMap<String, Uuid>,
    urns: HashMap<String, Uuid>,
    pending: HashMap<Uuid, Box<dyn Resource>>,
    order: Vec<Uuid>,
    in_progress: HashSet<Uuid>,
}

impl<'a> DecodeContext<'a> {
    pub(crate) fn new(decoder: &'a Decoder<'a>) -> Self {
        Self {
            decoder,
            doc_ids: HashMap::new(),
            urns: HashMap::new(),
            pending: HashMap::new(),
            order: Vec::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.decoder.registry
    }

    /// Decode one resource element, returning the identity it resolved to.
    pub fn decode_element(&mut self, el: &Element) -> Result<Uuid> {
        if let Some(id) = el.attr("idref").and_then(|r| self.doc_ids.get(r)).copied() {
            return Ok(id);
        }

        let resource = match self.resolve(el)? {
            Target::Known(id) => {
                self.bind_doc_id(el, id);
                if self.in_progress.contains(&id) {
                    return Ok(id);
                }
                self.take(id).ok_or_else(|| {
                    CodecError::consistency(format!("resource {} disappeared during decode", id))
                })?
            }
            Target::Create(gurn) => self.instantiate(el, &gurn)?,
        };

        self.finish(resource, el)
    }

    /// Decode an element that may carry no identity-forming attributes.
    ///
    /// Elements that do carry them, or whose `fallback` URN is already
    /// known, go through [`decode_element`](Self::decode_element) resolution;
    /// anything else becomes a new resource of `ty` named by `fallback`.
    pub fn decode_owned(&mut self, el: &Element, ty: TypeRef, fallback: Gurn) -> Result<Uuid> {
        let identified = el.attr("component_id").is_some()
            || el.attr("sliver_id").is_some()
            || self.resolve_reference(el).is_some();
        if identified {
            return self.decode_element(el);
        }

        let resource = match self.find_urn(&fallback) {
            Some(id) if self.in_progress.contains(&id) => return Ok(id),
            Some(id) => self.take(id),
            None => None,
        };
        let resource = match resource {
            Some(resource) => resource,
            None => self.decoder.factory.instantiate(ty, &fallback)?,
        };
        self.finish(resource, el)
    }

    fn finish(&mut self, mut resource: Box<dyn Resource>, el: &Element) -> Result<Uuid> {
        let id = resource.identity();
        self.bind_doc_id(el, id);
        self.index_urn(resource.as_ref());

        self.in_progress.insert(id);
        let populated = self.populate(resource.as_mut(), el);
        self.in_progress.remove(&id);
        populated?;

        self.index_urn(resource.as_ref());
        self.stage(resource);
        Ok(id)
    }

    /// Decode every child of `parent` whose tag is the one registered for `ty`.
    pub fn decode_children_of_type(&mut self, parent: &Element, ty: TypeRef) -> Result<Vec<Uuid>> {
        let tag = self.registry().tag_name(ty);
        let mut ids = Vec::new();
        for child in parent.children_named(&tag) {
            ids.push(self.decode_element(child)?);
        }
        Ok(ids)
    }

    /// Decode the resource elements nested in each `def` wrapper child.
    pub fn decode_wrapped(
        &mut self,
        parent: &Element,
        def: &PropertyDefinition,
    ) -> Result<Vec<Uuid>> {
        let name = self.registry().qualified_name(def)?;
        let mut ids = Vec::new();
        for wrapper in parent.children_named(&name) {
            for nested in wrapper.children() {
                ids.push(self.decode_element(nested)?);
            }
        }
        Ok(ids)
    }

    /// Identity an element refers to without decoding it: a document id,
    /// an identity attribute, or a known `component_id`.
    pub fn resolve_reference(&self, el: &Element) -> Option<Uuid> {
        if let Some(id) = el.attr("idref").and_then(|r| self.doc_ids.get(r)) {
            return Some(*id);
        }
        if let Some(id) = self.identity_attribute(el) {
            return Some(id);
        }
        let gurn = Gurn::parse(el.attr("component_id")?).ok()?;
        match gurn.identity() {
            Some(id) if self.is_known(id) => Some(id),
            _ => self.find_urn(&gurn),
        }
    }

    fn resolve(&self, el: &Element) -> Result<Target> {
        if let Some(id) = self.identity_attribute(el) {
            return Ok(Target::Known(id));
        }

        if let Some(component_id) = el.attr("component_id") {
            let gurn = Gurn::parse(component_id)
                .map_err(|e| CodecError::schema(format!("invalid component_id: {}", e)))?;
            let known = match gurn.identity() {
                Some(id) => Some(id).filter(|id| self.is_known(*id)),
                None => self.find_urn(&gurn),
            };
            return Ok(known.map(Target::Known).unwrap_or(Target::Create(gurn)));
        }

        let sliver_id = el
            .attr("sliver_id")
            .ok_or_else(|| {
                CodecError::schema(format!("Need 'sliver_id' for resource <{}>", el.name()))
            })?;
        let sliver = Gurn::parse(sliver_id)
            .map_err(|e| CodecError::schema(format!("invalid sliver_id: {}", e)))?;
        let client_id = el
            .attr("client_id")
            .ok_or_else(|| {
                CodecError::schema(format!("Need 'client_id' for resource <{}>", el.name()))
            })?;

        let gurn = Gurn::create(
            format!("{}:{}", sliver.short_name(), client_id),
            sliver.domain(),
            el.local_name(),
        );
        Ok(match self.find_urn(&gurn) {
            Some(id) => Target::Known(id),
            None => Target::Create(gurn),
        })
    }

    fn identity_attribute(&self, el: &Element) -> Option<Uuid> {
        ["uuid", "idref", "id"]
            .iter()
            .filter_map(|attr| el.attr(attr))
            .filter_map(|text| Uuid::parse_str(text).ok())
            .find(|id| self.is_known(*id))
    }

    fn instantiate(&self, el: &Element, gurn: &Gurn) -> Result<Box<dyn Resource>> {
        let registry = self.registry();
        let ty = registry
            .resolve_type(gurn.type_name())
            .or_else(|| registry.resolve_type(el.name()))
            .ok_or_else(|| {
                CodecError::schema(format!(
                    "unknown resource type '{}' (known: {})",
                    gurn.type_name(),
                    registry.types().tags().join(", ")
                ))
            })?;
        log::debug!("[decoder] new {:?} for {}", ty, gurn);
        self.decoder.factory.instantiate(ty, gurn)
    }

    fn populate(&mut self, resource: &mut dyn Resource, el: &Element) -> Result<()> {
        let registry = self.registry();

        for child in el.children() {
            match child.namespace() {
                None => log::warn!(
                    "[decoder] <{}> in <{}> has no namespace, expected '{}'",
                    child.name(),
                    el.name(),
                    SFA_NAMESPACE_URI
                ),
                Some(ns) if ns != SFA_NAMESPACE_URI => log::warn!(
                    "[decoder] <{}> in <{}> uses non-default namespace '{}'",
                    child.name(),
                    el.name(),
                    ns
                ),
                Some(_) => {}
            }
        }

        let defs = registry.merged_defs(resource.resource_type());
        for def in defs.serializable() {
            if resource.decode_property(def, el, self)? {
                continue;
            }
            let name = registry.qualified_name(def)?;
            match &def.representation {
                Representation::Attribute => {
                    if let Some(text) = el.attr(&name) {
                        resource.set(def.accessor_name(), def.cast(text)?)?;
                    }
                }
                Representation::AttrValue(attr) => {
                    let values = el
                        .children_named(&name)
                        .filter_map(|child| child.attr(attr))
                        .map(|text| def.cast(text))
                        .collect::<Result<Vec<_>>>()?;
                    assign(resource, def, values)?;
                }
                Representation::Element => {
                    let mut values = Vec::new();
                    for child in el.children_named(&name) {
                        values.extend(self.element_values(def, child)?);
                    }
                    assign(resource, def, values)?;
                }
                // spliced content has no wrapper to key on; types decode it
                // through decode_property
                Representation::Inline => {}
            }
        }
        Ok(())
    }

    fn element_values(&mut self, def: &PropertyDefinition, child: &Element) -> Result<Vec<Value>> {
        if let TypeTag::Resource(_) = def.type_tag {
            let nested: Vec<&Element> = child.children().collect();
            if !nested.is_empty() {
                return nested
                    .into_iter()
                    .map(|n| self.decode_element(n).map(Value::Ref))
                    .collect();
            }
            let text = child.text();
            if text.trim().is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![def.cast(&text)?]);
        }
        Ok(vec![def.cast(&child.text())?])
    }

    fn bind_doc_id(&mut self, el: &Element, id: Uuid) {
        if let Some(doc_id) = el.attr("id") {
            self.doc_ids.insert(doc_id.to_string(), id);
        }
    }

    fn index_urn(&mut self, resource: &dyn Resource) {
        if let Some(urn) = resource.urn() {
            self.urns.insert(urn.to_string(), resource.identity());
        }
    }

    fn is_known(&self, id: Uuid) -> bool {
        self.in_progress.contains(&id)
            || self.pending.contains_key(&id)
            || self.decoder.store.find_by_identity(id).is_some()
    }

    fn find_urn(&self, gurn: &Gurn) -> Option<Uuid> {
        self.urns
            .get(&gurn.to_string())
            .copied()
            .or_else(|| self.decoder.store.find_by_urn(gurn).map(|r| r.identity()))
    }

    fn take(&mut self, id: Uuid) -> Option<Box<dyn Resource>> {
        self.pending
            .remove(&id)
            .or_else(|| self.decoder.store.find_by_identity(id).map(|r| r.clone_resource()))
    }

    fn stage(&mut self, resource: Box<dyn Resource>) {
        let id = resource.identity();
        if !self.order.contains(&id) {
            self.order.push(id);
        }
        self.pending.insert(id, resource);
    }

    fn commit(mut self) -> Result<Vec<Arc<dyn Resource>>> {
        let batch: Vec<Box<dyn Resource>> = self
            .order
            .iter()
            .filter_map(|id| self.pending.remove(id))
            .collect();
        log::debug!("[decoder] committing {} resource(s)", batch.len());
        self.decoder
            .store
            .save_all(batch)
            .map_err(CodecError::Persistence)
    }
}

/// Assign decoded values to a property.
///
/// Multi-valued properties are replaced by the full sequence, so patching an
/// existing resource never duplicates entries; single-valued properties keep
/// the last value.
pub fn assign(
    resource: &mut dyn Resource,
    def: &PropertyDefinition,
    values: Vec<Value>,
) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    if def.multi_valued {
        return resource.set(def.accessor_name(), Value::List(values));
    }
    for value in values {
        resource.set(def.accessor_name(), value)?;
    }
    Ok(())
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resource graph -> markup.
//!
//! Every resource is rendered in full at most once per document. Later
//! occurrences (shared references, cycles) become an element carrying only
//! `idref`, pointing at the `id` of the first occurrence.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{CodecError, Result};
use crate::registry::{PropertyDefinition, Registry, Representation};
use crate::resource::{Resource, ResourceStore};
use crate::session::{EncodeOptions, MarkupSession};
use crate::value::Value;
use crate::xml::{Document, Element};
use crate::{OMF_PREFIX, SFA_NAMESPACE_URI};

/// Root value of a markup encode.
#[derive(Clone, Copy)]
pub enum MarkupRoot<'r> {
    /// The resource element is the document root.
    Single(&'r dyn Resource),
    /// Advertisement document: an `rspec` root holding one element per resource.
    Many(&'r [Arc<dyn Resource>]),
}

/// Encoder over a registry and the store used to resolve references.
pub struct Encoder<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) store: &'a dyn ResourceStore,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a Registry, store: &'a dyn ResourceStore) -> Self {
        Self { registry, store }
    }

    /// Encode a resource or a resource collection into a document.
    pub fn encode_markup(&self, root: MarkupRoot<'_>, options: EncodeOptions) -> Result<Document> {
        let mut session = MarkupSession::new(options);
        let doc = match root {
            MarkupRoot::Single(resource) => {
                let el = self.emit(resource, &mut session, true)?;
                Document::new(el)
            }
            MarkupRoot::Many(resources) => {
                let mut rspec = self.advertisement_root(session.options());
                for resource in resources {
                    let el = self.emit(resource.as_ref(), &mut session, false)?;
                    rspec.add_child(el);
                }
                Document::new(rspec)
            }
        };
        log::debug!(
            "[encoder] rendered {} resource(s) into <{}>",
            session.emitted_count(),
            doc.root().name()
        );
        Ok(doc)
    }

    /// Shorthand for [`MarkupRoot::Single`].
    pub fn encode_resource(
        &self,
        resource: &dyn Resource,
        options: EncodeOptions,
    ) -> Result<Document> {
        self.encode_markup(MarkupRoot::Single(resource), options)
    }

    /// Shorthand for [`MarkupRoot::Many`].
    pub fn encode_advertisement(
        &self,
        resources: &[Arc<dyn Resource>],
        options: EncodeOptions,
    ) -> Result<Document> {
        self.encode_markup(MarkupRoot::Many(resources), options)
    }

    fn advertisement_root(&self, options: &EncodeOptions) -> Element {
        let generated = options.generated_at.unwrap_or_else(Utc::now);
        let expires = generated + options.valid_for;

        let mut root = Element::new("rspec");
        self.declare_namespaces(&mut root);
        root.set_attr("type", "advertisement");
        root.set_attr("generated", generated.to_rfc3339_opts(SecondsFormat::Secs, true));
        root.set_attr("expires", expires.to_rfc3339_opts(SecondsFormat::Secs, true));
        root
    }

    fn declare_namespaces(&self, root: &mut Element) {
        root.set_attr("xmlns", SFA_NAMESPACE_URI);
        for (prefix, uri) in self.registry.namespaces().entries() {
            root.set_attr(format!("xmlns:{}", prefix), uri);
        }
    }

    /// Render one resource, or a bare `idref` if already rendered.
    fn emit(
        &self,
        resource: &dyn Resource,
        session: &mut MarkupSession,
        is_root: bool,
    ) -> Result<Element> {
        let mut el = Element::new(self.registry.tag_name(resource.resource_type()));
        if is_root {
            self.declare_namespaces(&mut el);
        }

        let identity = resource.identity();
        if let Some(id) = session.emitted_id(identity) {
            el.set_attr("idref", id);
            return Ok(el);
        }

        let id = identity.to_string();
        session.mark_emitted(identity, id.clone());
        el.set_attr("id", id);
        if let Some(prefix) = session.options().href_prefix.clone() {
            let attr = self.registry.qualify("href", Some(OMF_PREFIX))?;
            el.set_attr(attr, resource.href(&prefix));
        }

        session.enter();
        let result = self.emit_properties(resource, &mut el, session);
        session.leave();
        result?;
        Ok(el)
    }

    fn emit_properties(
        &self,
        resource: &dyn Resource,
        el: &mut Element,
        session: &mut MarkupSession,
    ) -> Result<()> {
        let defs = self.registry.merged_defs(resource.resource_type());
        for def in defs.serializable() {
            // max_depth is carried on the definition; truncation is not applied yet.
            let value = match resource.get(def.accessor_name()).or_else(|| def.default.clone()) {
                Some(value) => value,
                None => continue,
            };
            self.emit_property(def, &value, el, session)?;
        }
        Ok(())
    }

    fn emit_property(
        &self,
        def: &PropertyDefinition,
        value: &Value,
        el: &mut Element,
        session: &mut MarkupSession,
    ) -> Result<()> {
        let name = self.registry.qualified_name(def)?;
        match &def.representation {
            Representation::Attribute => el.set_attr(name, value.to_string()),
            Representation::AttrValue(attr) => {
                el.add_child(Element::new(name).with_attr(attr.clone(), value.to_string()));
            }
            Representation::Inline => {
                for item in value.items() {
                    self.emit_item(item, el, session)?;
                }
            }
            Representation::Element => {
                // one wrapper per item, so multi-valued properties decode
                // back through repeated assignment
                for item in value.items() {
                    let mut wrapper = Element::new(name.clone());
                    self.emit_item(item, &mut wrapper, session)?;
                    el.add_child(wrapper);
                }
            }
        }
        Ok(())
    }

    fn emit_item(
        &self,
        item: &Value,
        target: &mut Element,
        session: &mut MarkupSession,
    ) -> Result<()> {
        match item {
            Value::Ref(id) => {
                let resource = self.resolve(*id)?;
                let child = self.emit(resource.as_ref(), session, false)?;
                target.add_child(child);
            }
            scalar => target.push_text(scalar.to_string()),
        }
        Ok(())
    }

    pub(crate) fn resolve(&self, id: Uuid) -> Result<Arc<dyn Resource>> {
        self.store
            .find_by_identity(id)
            .ok_or_else(|| {
                CodecError::consistency(format!("dangling reference to resource {}", id))
            })
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Aggregate manager facade.
//!
//! Owns the codec registry, the resource store and the model factory, and
//! answers the read/create requests of the AM front ends.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use omf_sfa::decoder::assign;
use omf_sfa::model::{self, ModelFactory, ACCOUNT, LEASE, O_COMPONENT};
use omf_sfa::{
    CodecError, Decoder, Document, EncodeOptions, Encoder, Gurn, MemoryStore, Registry, Resource,
    ResourceFactory, ResourceStore, TreeRecord, TreeSession, TypeRef, Value,
};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{AmConfig, ConfigError};

/// Message keys that never map onto resource properties.
const IGNORED_KEYS: &[&str] = &["type", "uid", "hrn", "property", "instrument"];

/// Aggregate manager errors.
#[derive(Debug, Error)]
pub enum AmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Unknown resource type '{0}'")]
    UnknownType(String),

    #[error("Unknown property '{property}' for {type_name}")]
    UnknownProperty { type_name: String, property: String },

    #[error("Unknown resource kind '{0}' (expected resources, components, leases or slices)")]
    UnknownKind(String),
}

/// Resource selections served by `list` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Resources,
    Components,
    Leases,
    /// Accounts, called slices on the wire.
    Slices,
}

impl FromStr for ResourceKind {
    type Err = AmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resources" => Ok(Self::Resources),
            "components" => Ok(Self::Components),
            "leases" => Ok(Self::Leases),
            "slices" | "accounts" => Ok(Self::Slices),
            other => Err(AmError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Resources => "resources",
            Self::Components => "components",
            Self::Leases => "leases",
            Self::Slices => "slices",
        };
        f.write_str(s)
    }
}

/// Resource manager of one aggregate.
pub struct AmManager {
    registry: Arc<Registry>,
    store: MemoryStore,
    factory: ModelFactory,
    domain: String,
    href_prefix: Option<String>,
    valid_for: chrono::Duration,
}

impl AmManager {
    /// Manager with a fresh registry populated from `config`.
    pub fn new(config: &AmConfig) -> Result<Self, AmError> {
        config.validate()?;
        let registry = Registry::new();
        model::register(&registry, &config.am.domain)?;
        for ns in &config.namespaces {
            registry.register_namespace(&ns.prefix, &ns.uri)?;
        }
        Ok(Self::with_registry(Arc::new(registry), config))
    }

    /// Manager sharing an already-populated registry.
    pub fn with_registry(registry: Arc<Registry>, config: &AmConfig) -> Self {
        tracing::debug!(
            "AM manager for domain '{}' ({} registered tags)",
            config.am.domain,
            registry.types().tags().len()
        );
        Self {
            registry,
            store: MemoryStore::new(),
            factory: ModelFactory,
            domain: config.am.domain.clone(),
            href_prefix: config.am.href_prefix.clone(),
            valid_for: config.advertisement_valid_for(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Take `resource` under management.
    pub fn manage_resource(
        &self,
        resource: Box<dyn Resource>,
    ) -> Result<Arc<dyn Resource>, AmError> {
        let saved = self.store.save(resource).map_err(CodecError::Persistence)?;
        tracing::debug!("Managing {:?} '{}'", saved.resource_type(), saved.identity());
        Ok(saved)
    }

    /// Take a batch under management, all or nothing.
    pub fn manage_resources(
        &self,
        resources: Vec<Box<dyn Resource>>,
    ) -> Result<Vec<Arc<dyn Resource>>, AmError> {
        let saved = self
            .store
            .save_all(resources)
            .map_err(CodecError::Persistence)?;
        tracing::info!("Managing {} resources", saved.len());
        Ok(saved)
    }

    pub fn find_all_resources(&self) -> Vec<Arc<dyn Resource>> {
        self.store.all()
    }

    /// Every resource whose type derives from `OComponent`.
    pub fn find_all_components(&self) -> Vec<Arc<dyn Resource>> {
        self.find_all(|ty| ty.is_subtype_of(&O_COMPONENT))
    }

    pub fn find_all_leases(&self) -> Vec<Arc<dyn Resource>> {
        self.find_all(|ty| *ty == LEASE)
    }

    pub fn find_all_accounts(&self) -> Vec<Arc<dyn Resource>> {
        self.find_all(|ty| *ty == ACCOUNT)
    }

    fn find_all(&self, pred: impl Fn(TypeRef) -> bool) -> Vec<Arc<dyn Resource>> {
        self.store
            .all()
            .into_iter()
            .filter(|r| pred(r.resource_type()))
            .collect()
    }

    /// Resources of one kind.
    pub fn find_kind(&self, kind: ResourceKind) -> Vec<Arc<dyn Resource>> {
        match kind {
            ResourceKind::Resources => self.find_all_resources(),
            ResourceKind::Components => self.find_all_components(),
            ResourceKind::Leases => self.find_all_leases(),
            ResourceKind::Slices => self.find_all_accounts(),
        }
    }

    /// Options carrying the configured href prefix and validity window.
    pub fn encode_options(&self) -> EncodeOptions {
        let options = EncodeOptions::new().valid_for(self.valid_for);
        match &self.href_prefix {
            Some(prefix) => options.href_prefix(prefix.clone()),
            None => options,
        }
    }

    /// Advertisement RSpec listing every managed component.
    pub fn advertisement(&self) -> Result<String, AmError> {
        self.advertisement_with(self.encode_options())
    }

    /// Advertisement with explicit options (pinned timestamps, detail).
    pub fn advertisement_with(&self, options: EncodeOptions) -> Result<String, AmError> {
        Ok(self.advertisement_document(options)?.to_xml_string())
    }

    pub fn advertisement_document(&self, options: EncodeOptions) -> Result<Document, AmError> {
        let components = self.find_all_components();
        let doc = Encoder::new(&self.registry, &self.store)
            .encode_advertisement(&components, options)?;
        tracing::debug!("Advertising {} components", components.len());
        Ok(doc)
    }

    /// Tree records of one kind of resources.
    pub fn resources_to_tree(&self, kind: ResourceKind) -> Result<Vec<TreeRecord>, AmError> {
        self.to_tree(&self.find_kind(kind))
    }

    /// Tree records of `resources`, sharing one href session.
    pub fn to_tree(&self, resources: &[Arc<dyn Resource>]) -> Result<Vec<TreeRecord>, AmError> {
        let records = Encoder::new(&self.registry, &self.store)
            .encode_tree_all(resources, self.encode_options())?;
        Ok(records)
    }

    /// Create a resource from a create message.
    ///
    /// `type_name` is the wire type (`node`, `lease`, ...); `properties` are
    /// cast through the type's property definitions. The new resource is
    /// managed and answered with its tree record.
    pub fn create_resource(
        &self,
        type_name: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<TreeRecord, AmError> {
        let camel = camelize(type_name);
        let ty = model::type_by_name(&camel)
            .ok_or_else(|| AmError::UnknownType(type_name.to_string()))?;
        tracing::debug!("Creating {} with {:?}", camel, properties);

        let name = properties
            .get("name")
            .cloned()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let tag = self.registry.tag_name(ty);
        let local = tag.rsplit(':').next().unwrap_or(&tag);
        let urn = Gurn::create(name, self.domain.clone(), local);
        let mut resource = self.factory.instantiate(ty, &urn)?;

        let defs = self.registry.merged_defs(ty);
        for (key, text) in properties {
            if IGNORED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let def = defs
                .get(key)
                .or_else(|| defs.by_accessor(key))
                .filter(|d| !d.is_reserved())
                .ok_or_else(|| AmError::UnknownProperty {
                    type_name: camel.clone(),
                    property: key.clone(),
                })?;
            let values = if def.multi_valued {
                text.split(',')
                    .filter(|t| !t.trim().is_empty())
                    .map(|t| def.cast(t))
                    .collect::<Result<Vec<Value>, _>>()?
            } else {
                vec![def.cast(text)?]
            };
            assign(resource.as_mut(), def, values)?;
        }

        let saved = self.manage_resource(resource)?;
        let mut session = TreeSession::new(self.encode_options());
        let record = Encoder::new(&self.registry, &self.store)
            .encode_tree(saved.as_ref(), &mut session)?;
        tracing::info!("Created {} '{}'", camel, saved.identity());
        Ok(record)
    }

    /// Decode a request RSpec into managed resources.
    pub fn apply_rspec(&self, xml: &str) -> Result<Vec<Arc<dyn Resource>>, AmError> {
        let resources = Decoder::new(&self.registry, &self.store, &self.factory)
            .decode_document(xml)?;
        tracing::info!("Applied RSpec: {} resources", resources.len());
        Ok(resources)
    }
}

/// `ip_address` -> `IpAddress`, `node` -> `Node`.
fn camelize(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use omf_sfa::model::{Lease, Node};
    use omf_sfa::ErrorKind;

    fn manager() -> AmManager {
        let mut config = AmConfig::default();
        config.am.domain = "testbed".into();
        AmManager::new(&config).unwrap()
    }

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("node"), "Node");
        assert_eq!(camelize("ip_address"), "IpAddress");
        assert_eq!(camelize("Lease"), "Lease");
    }

    #[test]
    fn test_resource_kind() {
        assert_eq!("slices".parse::<ResourceKind>().unwrap(), ResourceKind::Slices);
        assert_eq!("accounts".parse::<ResourceKind>().unwrap(), ResourceKind::Slices);
        assert!(matches!(
            "widgets".parse::<ResourceKind>(),
            Err(AmError::UnknownKind(_))
        ));
        assert_eq!(ResourceKind::Components.to_string(), "components");
    }

    #[test]
    fn test_find_by_kind() {
        let am = manager();
        am.manage_resources(vec![
            Box::new(Node::new("n1")),
            Box::new(Lease::new("l1")),
        ])
        .unwrap();

        assert_eq!(am.find_all_resources().len(), 2);
        assert_eq!(am.find_all_components().len(), 1);
        assert_eq!(am.find_all_leases().len(), 1);
        assert!(am.find_all_accounts().is_empty());
    }

    #[test]
    fn test_create_resource() {
        let am = manager();
        let record = am
            .create_resource(
                "node",
                &props(&[
                    ("name", "node9"),
                    ("hardware_type", "pc"),
                    ("available", "true"),
                    ("uid", "ignored"),
                ]),
            )
            .unwrap();

        assert_eq!(record["name"], "node9");
        assert_eq!(record["sfa_class"], "node");
        assert_eq!(record["hardware_type"], "pc");
        assert_eq!(record["available"], "true");
        assert_eq!(record["comp_gurn"], "urn:publicid:IDN+testbed+node+node9");
        assert_eq!(am.find_all_components().len(), 1);
    }

    #[test]
    fn test_create_through_accessor_alias() {
        let am = manager();
        let record = am
            .create_resource("ip", &props(&[("address", "10.0.0.9"), ("ip_type", "ipv4")]))
            .unwrap();
        assert_eq!(record["type"], "ipv4");
    }

    #[test]
    fn test_create_errors() {
        let am = manager();
        assert!(matches!(
            am.create_resource("widget", &BTreeMap::new()),
            Err(AmError::UnknownType(_))
        ));
        assert!(matches!(
            am.create_resource("node", &props(&[("colour", "red")])),
            Err(AmError::UnknownProperty { .. })
        ));
        match am.create_resource("node", &props(&[("available", "maybe")])) {
            Err(AmError::Codec(e)) => assert_eq!(e.kind(), ErrorKind::Consistency),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
        assert!(am.find_all_resources().is_empty());
    }

    #[test]
    fn test_extra_namespace_conflict() {
        let mut config = AmConfig::default();
        config.namespaces.push(crate::config::NamespaceConfig {
            prefix: "omf".into(),
            uri: "urn:other".into(),
        });
        match AmManager::new(&config) {
            Err(AmError::Codec(e)) => assert_eq!(e.kind(), ErrorKind::Configuration),
            Err(e) => panic!("unexpected {}", e),
            Ok(_) => panic!("conflicting prefix accepted"),
        }
    }
}

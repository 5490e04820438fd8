// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OMF SFA resource codec
//!
//! Serializes aggregate-manager resource graphs into the SFA RSpec markup
//! dialect (and a flat tree-of-maps form), and decodes RSpec markup back into
//! typed, persisted resources.
//!
//! # Features
//!
//! - **Declarative properties**: per-type definitions inherited down a
//!   single-rooted type hierarchy, with late declarations propagating to
//!   already-cached subtypes
//! - **Cycle-safe encoding**: every resource is rendered once per document,
//!   repeats become `idref` elements
//! - **Identity resolution on decode**: by identity, component URN, or
//!   sliver/client id, patching existing resources in place
//! - **All-or-nothing commits**: a decode persists every touched resource in
//!   one batch, or none of them
//!
//! # Quick Start
//!
//! ```
//! use omf_sfa::model::{self, ModelFactory, Node};
//! use omf_sfa::{Decoder, EncodeOptions, Encoder, Gurn, MemoryStore, Registry, ResourceStore};
//!
//! let registry = Registry::new();
//! model::register(&registry, "testbed").unwrap();
//! let store = MemoryStore::new();
//!
//! let node = Node::new("node1").with_urn(Gurn::create("node1", "testbed", "node"));
//! let node = store.save(Box::new(node)).unwrap();
//!
//! let doc = Encoder::new(&registry, &store)
//!     .encode_resource(node.as_ref(), EncodeOptions::default())
//!     .unwrap();
//! let xml = doc.to_xml_string();
//!
//! let decoded = Decoder::new(&registry, &store, &ModelFactory)
//!     .decode_document(&xml)
//!     .unwrap();
//! assert_eq!(decoded[0].identity(), node.identity());
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod gurn;
pub mod model;
pub mod registry;
pub mod resource;
pub mod session;
pub mod store;
pub mod tree;
pub mod value;
pub mod xml;

pub use decoder::{DecodeContext, Decoder};
pub use encoder::{Encoder, MarkupRoot};
pub use error::{CodecError, ErrorKind, Result};
pub use gurn::{Gurn, GurnError};
pub use registry::{
    Primitive, PropertyDefinition, PropertyDefinitionSet, PropertyOptions, Registry,
    Representation, ResourceType, TypeRef, TypeTag,
};
pub use resource::{Resource, ResourceFactory, ResourceStore};
pub use session::{EncodeOptions, MarkupSession, TreeSession};
pub use store::MemoryStore;
pub use tree::TreeRecord;
pub use value::Value;
pub use xml::{Document, Element};

/// Default namespace of the RSpec dialect.
pub const SFA_NAMESPACE_URI: &str = "http://www.geni.net/resources/rspec/3";

/// Prefix of the OMF extension namespace (`omf:href`, `omf:cmc`).
pub const OMF_PREFIX: &str = "omf";
pub const OMF_NAMESPACE_URI: &str = "http://schema.mytestbed.net/sfa/rspec/1";

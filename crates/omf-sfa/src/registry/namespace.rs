// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XML namespace prefix table.

use parking_lot::RwLock;

use crate::error::{CodecError, Result};

/// Append-only table of namespace prefixes and their URIs.
///
/// Registration order is preserved: declarations are written onto document
/// roots in the order prefixes were registered.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    entries: RwLock<Vec<(String, String)>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `prefix` for `uri`.
    ///
    /// Registering the same pair twice is a no-op; binding an existing prefix
    /// to a different URI is a configuration error.
    pub fn register(&self, prefix: &str, uri: &str) -> Result<()> {
        if prefix.is_empty() || prefix.contains(':') {
            return Err(CodecError::config(format!(
                "invalid namespace prefix '{}'",
                prefix
            )));
        }

        let mut entries = self.entries.write();
        if let Some((_, existing)) = entries.iter().find(|(p, _)| p == prefix) {
            if existing == uri {
                return Ok(());
            }
            return Err(CodecError::config(format!(
                "namespace prefix '{}' already bound to '{}', refusing '{}'",
                prefix, existing, uri
            )));
        }
        entries.push((prefix.to_string(), uri.to_string()));
        Ok(())
    }

    /// URI bound to `prefix`.
    pub fn uri(&self, prefix: &str) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.clone())
    }

    /// First prefix bound to `uri`.
    pub fn prefix_for(&self, uri: &str) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.clone())
    }

    /// `"prefix:name"` when a prefix is given, `name` otherwise.
    pub fn qualify(&self, name: &str, prefix: Option<&str>) -> Result<String> {
        match prefix {
            None => Ok(name.to_string()),
            Some(prefix) => {
                if self.uri(prefix).is_none() {
                    return Err(CodecError::config(format!(
                        "unknown namespace '{}' for '{}'",
                        prefix, name
                    )));
                }
                Ok(format!("{}:{}", prefix, name))
            }
        }
    }

    /// Snapshot of all `(prefix, uri)` pairs in registration order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_register_and_qualify() {
        let ns = NamespaceRegistry::new();
        ns.register("omf", "http://schema.mytestbed.net/sfa/rspec/1")
            .unwrap();

        assert_eq!(ns.qualify("href", Some("omf")).unwrap(), "omf:href");
        assert_eq!(ns.qualify("href", None).unwrap(), "href");
        assert_eq!(
            ns.prefix_for("http://schema.mytestbed.net/sfa/rspec/1"),
            Some("omf".to_string())
        );
    }

    #[test]
    fn test_qualify_unknown_prefix() {
        let ns = NamespaceRegistry::new();
        let err = ns.qualify("lease", Some("ol")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_duplicate_prefix() {
        let ns = NamespaceRegistry::new();
        ns.register("ol", "urn:a").unwrap();
        ns.register("ol", "urn:a").unwrap();
        assert!(ns.register("ol", "urn:b").is_err());
        assert_eq!(ns.entries().len(), 1);
    }

    #[test]
    fn test_registration_order() {
        let ns = NamespaceRegistry::new();
        ns.register("omf", "urn:omf").unwrap();
        ns.register("ol", "urn:ol").unwrap();
        let prefixes: Vec<String> = ns.entries().into_iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["omf", "ol"]);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Aggregate manager configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Aggregate manager configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmConfig {
    #[serde(default)]
    pub am: AmSection,

    /// Extra namespace prefixes beyond the built-in `omf` and `ol`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<NamespaceConfig>,

    /// Transport endpoints. Informational only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<EndpointConfig>,
}

/// The `[am]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmSection {
    /// Default GURN domain.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Prefix for `omf:href` attributes and tree record hrefs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href_prefix: Option<String>,

    /// Advertisement validity window (seconds).
    #[serde(default = "default_valid_secs")]
    pub advertisement_valid_secs: u64,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// chrono durations are bounded by i64 milliseconds
const MAX_VALID_SECS: i64 = i64::MAX / 1000;

fn default_domain() -> String {
    "omf:nitos".to_string()
}

fn default_valid_secs() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AmSection {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            href_prefix: None,
            advertisement_valid_secs: default_valid_secs(),
            log_level: default_log_level(),
        }
    }
}

/// One `[[namespaces]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    pub prefix: String,
    pub uri: String,
}

/// Endpoint transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Xmlrpc,
    Xmpp,
}

/// One `[[endpoints]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(rename = "type")]
    pub kind: EndpointKind,

    pub port: u16,
}

impl AmConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration written by `gen-config`.
    pub fn example() -> Self {
        Self {
            am: AmSection {
                href_prefix: Some("http://localhost:8001/resources".into()),
                ..Default::default()
            },
            namespaces: Vec::new(),
            endpoints: vec![
                EndpointConfig {
                    kind: EndpointKind::Xmlrpc,
                    port: 8001,
                },
                EndpointConfig {
                    kind: EndpointKind::Xmpp,
                    port: 5222,
                },
            ],
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.am.domain.trim().is_empty() {
            return Err(ConfigError::Invalid("am.domain must not be empty".into()));
        }
        if self.am.domain.contains('+') {
            return Err(ConfigError::Invalid(format!(
                "am.domain '{}' must not contain '+'",
                self.am.domain
            )));
        }
        if self.am.advertisement_valid_secs == 0 {
            return Err(ConfigError::Invalid(
                "am.advertisement_valid_secs must be positive".into(),
            ));
        }

        let mut prefixes = HashSet::new();
        for (i, ns) in self.namespaces.iter().enumerate() {
            if ns.prefix.is_empty() || ns.prefix.contains(':') {
                return Err(ConfigError::Invalid(format!(
                    "Namespace {} has invalid prefix '{}'",
                    i, ns.prefix
                )));
            }
            if ns.uri.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Namespace '{}' has empty uri",
                    ns.prefix
                )));
            }
            if !prefixes.insert(ns.prefix.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Namespace prefix '{}' declared twice",
                    ns.prefix
                )));
            }
        }

        let mut ports = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.port == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{:?} endpoint has port 0",
                    endpoint.kind
                )));
            }
            if !ports.insert(endpoint.port) {
                return Err(ConfigError::Invalid(format!(
                    "Port {} used by more than one endpoint",
                    endpoint.port
                )));
            }
        }

        Ok(())
    }

    /// Advertisement validity window.
    pub fn advertisement_valid_for(&self) -> chrono::Duration {
        let secs = i64::try_from(self.am.advertisement_valid_secs).unwrap_or(MAX_VALID_SECS);
        chrono::Duration::seconds(secs.min(MAX_VALID_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AmConfig::from_toml("").unwrap();
        assert_eq!(config.am.domain, "omf:nitos");
        assert_eq!(config.am.advertisement_valid_secs, 600);
        assert_eq!(config.am.log_level, "info");
        assert!(config.am.href_prefix.is_none());
        assert_eq!(config.advertisement_valid_for(), chrono::Duration::minutes(10));
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [am]
            domain = "testbed"
            href_prefix = "http://am:8001/resources"
            advertisement_valid_secs = 60

            [[namespaces]]
            prefix = "ex"
            uri = "urn:example"

            [[endpoints]]
            type = "xmlrpc"
            port = 8001

            [[endpoints]]
            type = "xmpp"
            port = 5222
        "#;
        let config = AmConfig::from_toml(toml).unwrap();
        assert_eq!(config.am.domain, "testbed");
        assert_eq!(config.namespaces[0].prefix, "ex");
        assert_eq!(config.endpoints[1].kind, EndpointKind::Xmpp);
        assert_eq!(config.advertisement_valid_for(), chrono::Duration::seconds(60));
    }

    #[test]
    fn test_unknown_endpoint_type() {
        let err = AmConfig::from_toml("[[endpoints]]\ntype = \"http\"\nport = 80\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = AmConfig::default();
        assert!(config.validate().is_ok());

        config.am.advertisement_valid_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AmConfig::default();
        config.am.domain = " ".into();
        assert!(config.validate().is_err());

        let mut config = AmConfig::default();
        for _ in 0..2 {
            config.namespaces.push(NamespaceConfig {
                prefix: "ex".into(),
                uri: "urn:example".into(),
            });
        }
        assert!(config.validate().is_err());

        let mut config = AmConfig::example();
        config.endpoints[1].port = 8001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_round_trips_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let example = AmConfig::example();
        file.write_all(example.to_toml().unwrap().as_bytes()).unwrap();

        let loaded = AmConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.am.href_prefix, example.am.href_prefix);
        assert_eq!(loaded.endpoints.len(), 2);
        assert_eq!(loaded.endpoints[0].kind, EndpointKind::Xmlrpc);
    }

    #[test]
    fn test_missing_file() {
        let err = AmConfig::from_file("/nonexistent/am.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global Unique Resource Names.
//!
//! Wire form follows the GENI publicid convention:
//!
//! ```text
//! urn:publicid:IDN+{domain}+{type}+{short_name}[:{identity}]
//! ```
//!
//! The optional identity fragment is the resource UUID appended to the short
//! name after a colon. Short names may themselves contain colons
//! (`sliceA:n0`), so only a trailing segment that parses as a UUID is taken
//! as the identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by every GURN.
pub const URN_PREFIX: &str = "urn:publicid:IDN+";

/// Errors produced while parsing a GURN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GurnError {
    /// String does not start with [`URN_PREFIX`].
    MissingPrefix(String),
    /// Domain, type or short name missing.
    Incomplete(String),
}

impl fmt::Display for GurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GurnError::MissingPrefix(s) => {
                write!(f, "not a GURN (expected '{}'): {}", URN_PREFIX, s)
            }
            GurnError::Incomplete(s) => write!(f, "incomplete GURN: {}", s),
        }
    }
}

impl std::error::Error for GurnError {}

/// Parsed Global Unique Resource Name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gurn {
    domain: String,
    type_name: String,
    short_name: String,
    identity: Option<Uuid>,
}

impl Gurn {
    /// Build a GURN from its parts.
    pub fn create(
        short_name: impl Into<String>,
        domain: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            type_name: type_name.into(),
            short_name: short_name.into(),
            identity: None,
        }
    }

    /// Attach an identity fragment.
    pub fn with_identity(mut self, identity: Uuid) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Parse the wire form.
    pub fn parse(s: &str) -> Result<Self, GurnError> {
        let rest = s
            .trim()
            .strip_prefix(URN_PREFIX)
            .ok_or_else(|| GurnError::MissingPrefix(s.to_string()))?;

        let mut parts = rest.splitn(3, '+');
        let domain = parts.next().unwrap_or_default();
        let type_name = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if domain.is_empty() || type_name.is_empty() || name.is_empty() {
            return Err(GurnError::Incomplete(s.to_string()));
        }

        let (short_name, identity) = match name.rsplit_once(':') {
            Some((head, tail)) if !head.is_empty() => match Uuid::parse_str(tail) {
                Ok(uuid) => (head, Some(uuid)),
                Err(_) => (name, None),
            },
            _ => (name, Uuid::parse_str(name).ok()),
        };

        Ok(Self {
            domain: domain.to_string(),
            type_name: type_name.to_string(),
            short_name: short_name.to_string(),
            identity,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Identity fragment, if the GURN embeds one.
    pub fn identity(&self) -> Option<Uuid> {
        self.identity
    }
}

impl fmt::Display for Gurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}+{}+{}",
            URN_PREFIX, self.domain, self.type_name, self.short_name
        )?;
        // A short name that already is the identity carries no extra fragment.
        match self.identity {
            Some(id) if self.short_name != id.to_string() => write!(f, ":{}", id),
            _ => Ok(()),
        }
    }
}

impl FromStr for Gurn {
    type Err = GurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let gurn = Gurn::parse("urn:publicid:IDN+omf:nitos+node+node1").unwrap();
        assert_eq!(gurn.domain(), "omf:nitos");
        assert_eq!(gurn.type_name(), "node");
        assert_eq!(gurn.short_name(), "node1");
        assert_eq!(gurn.identity(), None);
    }

    #[test]
    fn test_parse_short_name_with_colons() {
        let gurn = Gurn::parse("urn:publicid:IDN+domainX+node+sliceA:n0").unwrap();
        assert_eq!(gurn.short_name(), "sliceA:n0");
        assert_eq!(gurn.identity(), None);
    }

    #[test]
    fn test_parse_identity_fragment() {
        let id = Uuid::new_v4();
        let s = format!("urn:publicid:IDN+domainX+interface+node1:if0:{}", id);
        let gurn = Gurn::parse(&s).unwrap();
        assert_eq!(gurn.short_name(), "node1:if0");
        assert_eq!(gurn.identity(), Some(id));
        assert_eq!(gurn.to_string(), s);
    }

    #[test]
    fn test_parse_bare_uuid_name() {
        let id = Uuid::new_v4();
        let gurn = Gurn::parse(&format!("urn:publicid:IDN+d+lease+{}", id)).unwrap();
        assert_eq!(gurn.identity(), Some(id));
        assert_eq!(gurn.short_name(), id.to_string());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Gurn::parse("node1"),
            Err(GurnError::MissingPrefix(_))
        ));
        assert!(matches!(
            Gurn::parse("urn:publicid:IDN+domain+node"),
            Err(GurnError::Incomplete(_))
        ));
    }

    #[test]
    fn test_create_display() {
        let gurn = Gurn::create("am", "omf:nitos", "authority");
        assert_eq!(gurn.to_string(), "urn:publicid:IDN+omf:nitos+authority+am");
        assert_eq!("urn:publicid:IDN+omf:nitos+authority+am".parse::<Gurn>().unwrap(), gurn);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Time-bounded reservation of components.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::base::{self, Core, O_RESOURCE};
use super::OL_PREFIX;
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{Primitive, PropertyOptions, Registry, ResourceType, TypeRef};
use crate::resource::Resource;
use crate::value::Value;

pub static LEASE: ResourceType = ResourceType::derive("Lease", &O_RESOURCE);

pub(super) fn declare(registry: &Registry) {
    for name in ["valid_from", "valid_until"] {
        registry.declare(
            &LEASE,
            name,
            PropertyOptions::new()
                .attribute()
                .namespace(OL_PREFIX)
                .primitive(Primitive::Time),
        );
    }
}

#[derive(Debug, Clone)]
pub struct Lease {
    core: Core,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
}

impl Lease {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(Core::new(name))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            valid_from: None,
            valid_until: None,
        }
    }

    pub fn with_urn(mut self, urn: Gurn) -> Self {
        self.core.set_urn(urn);
        self
    }

    pub fn with_window(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.valid_from = Some(from);
        self.valid_until = Some(until);
        self
    }

    pub fn valid_from(&self) -> Option<DateTime<Utc>> {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.valid_until
    }
}

impl Resource for Lease {
    fn resource_type(&self) -> TypeRef {
        &LEASE
    }

    fn identity(&self) -> Uuid {
        self.core.identity()
    }

    fn name(&self) -> Option<&str> {
        self.core.name()
    }

    fn urn(&self) -> Option<&Gurn> {
        self.core.urn()
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "valid_from" => self.valid_from.map(Value::Time),
            "valid_until" => self.valid_until.map(Value::Time),
            other => self.core.get(other),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "valid_from" => self.valid_from = Some(base::time(&LEASE, property, &value)?),
            "valid_until" => self.valid_until = Some(base::time(&LEASE, property, &value)?),
            other => {
                if !self.core.set(other, value)? {
                    return Err(base::unknown_property(&LEASE, other));
                }
            }
        }
        Ok(())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_accepts_text() {
        let mut lease = Lease::new("l1");
        lease
            .set("valid_from", "2012-09-13T09:00:00Z".into())
            .unwrap();
        assert_eq!(
            lease.valid_from(),
            Some(Utc.with_ymd_and_hms(2012, 9, 13, 9, 0, 0).unwrap())
        );
        assert!(lease.set("valid_until", "tomorrow".into()).is_err());
    }
}

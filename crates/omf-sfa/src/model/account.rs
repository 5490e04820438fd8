// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::base::{self, Core, O_RESOURCE};
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{Primitive, PropertyOptions, Registry, ResourceType, TypeRef};
use crate::resource::Resource;
use crate::value::Value;

pub static ACCOUNT: ResourceType = ResourceType::derive("Account", &O_RESOURCE);

pub(super) fn declare(registry: &Registry) {
    registry.declare(
        &ACCOUNT,
        "valid_until",
        PropertyOptions::new().attribute().primitive(Primitive::Time),
    );
}

/// Account (slice owner) known to the AM.
#[derive(Debug, Clone)]
pub struct Account {
    core: Core,
    valid_until: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(Core::new(name))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            valid_until: None,
        }
    }

    pub fn with_urn(mut self, urn: Gurn) -> Self {
        self.core.set_urn(urn);
        self
    }

    pub fn with_valid_until(mut self, until: DateTime<Utc>) -> Self {
        self.valid_until = Some(until);
        self
    }
}

impl Resource for Account {
    fn resource_type(&self) -> TypeRef {
        &ACCOUNT
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
            "valid_until" => self.valid_until.map(Value::Time),
            other => self.core.get(other),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "valid_until" => self.valid_until = Some(base::time(&ACCOUNT, property, &value)?),
            other => {
                if !self.core.set(other, value)? {
                    return Err(base::unknown_property(&ACCOUNT, other));
                }
            }
        }
        Ok(())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

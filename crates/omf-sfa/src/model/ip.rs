// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use uuid::Uuid;

use super::base::{self, Core, O_RESOURCE};
use crate::error::Result;
use crate::gurn::Gurn;
use crate::registry::{PropertyOptions, Registry, ResourceType, TypeRef};
use crate::resource::Resource;
use crate::value::Value;

pub static IP: ResourceType = ResourceType::derive("Ip", &O_RESOURCE);

pub(super) fn declare(registry: &Registry) {
    registry.declare(&IP, "address", PropertyOptions::new().attribute());
    registry.declare(&IP, "netmask", PropertyOptions::new().attribute());
    registry.declare(
        &IP,
        "type",
        PropertyOptions::new().attribute().accessor("ip_type"),
    );
}

/// IP address bound to an interface or a CMC.
#[derive(Debug, Clone)]
pub struct Ip {
    core: Core,
    address: Option<String>,
    netmask: Option<String>,
    ip_type: Option<String>,
}

impl Ip {
    pub fn new(
        address: impl Into<String>,
        netmask: impl Into<String>,
        ip_type: impl Into<String>,
    ) -> Self {
        let address = address.into();
        let mut ip = Self::from_core(Core::new(address.clone()));
        ip.address = Some(address);
        ip.netmask = Some(netmask.into());
        ip.ip_type = Some(ip_type.into());
        ip
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core,
            address: None,
            netmask: None,
            ip_type: None,
        }
    }

    pub fn with_urn(mut self, urn: Gurn) -> Self {
        self.core.set_urn(urn);
        self
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

impl Resource for Ip {
    fn resource_type(&self) -> TypeRef {
        &IP
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
            "address" => self.address.clone().map(Value::String),
            "netmask" => self.netmask.clone().map(Value::String),
            "ip_type" => self.ip_type.clone().map(Value::String),
            other => self.core.get(other),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "address" => self.address = Some(value.to_string()),
            "netmask" => self.netmask = Some(value.to_string()),
            "ip_type" => self.ip_type = Some(value.to_string()),
            other => {
                if !self.core.set(other, value)? {
                    return Err(base::unknown_property(&IP, other));
                }
            }
        }
        Ok(())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

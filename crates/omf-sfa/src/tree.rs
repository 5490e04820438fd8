// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resource -> tree-of-maps (JSON records).
//!
//! Tree records are flat: nested resources appear only as short records
//! (`name`, `uuid`, `sfa_class`, `href`), so no visited set is needed.
//! Sessions key records by `href`.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::encoder::Encoder;
use crate::error::{CodecError, Result};
use crate::resource::Resource;
use crate::session::{EncodeOptions, TreeSession};
use crate::value::Value;

/// One tree record.
pub type TreeRecord = serde_json::Map<String, JsonValue>;

impl Encoder<'_> {
    /// Short record: `name`, `uuid`, `sfa_class`, `href`.
    pub fn short_record(&self, resource: &dyn Resource, href_prefix: &str) -> TreeRecord {
        let mut record = TreeRecord::new();
        record.insert(
            "name".into(),
            resource
                .name()
                .map(|n| JsonValue::String(n.to_string()))
                .unwrap_or(JsonValue::Null),
        );
        record.insert("uuid".into(), JsonValue::String(resource.identity().to_string()));
        record.insert(
            "sfa_class".into(),
            JsonValue::String(self.registry.tag_name(resource.resource_type())),
        );
        record.insert("href".into(), JsonValue::String(resource.href(href_prefix)));
        record
    }

    /// Full record of `resource`.
    ///
    /// A resource already described in `session` yields its short record
    /// plus `comp_gurn`. An href already bound to a different identity is a
    /// consistency error.
    pub fn encode_tree(
        &self,
        resource: &dyn Resource,
        session: &mut TreeSession,
    ) -> Result<TreeRecord> {
        let prefix = session.href_prefix().to_string();
        let href = resource.href(&prefix);
        let identity = resource.identity();

        let repeated = match session.described(&href) {
            Some(owner) if owner != identity => {
                return Err(CodecError::consistency(format!(
                    "href '{}' already describes resource {} (not {})",
                    href, owner, identity
                )));
            }
            Some(_) => true,
            None => false,
        };

        let mut record = self.short_record(resource, &prefix);
        if let Some(urn) = resource.urn() {
            record.insert("comp_gurn".into(), JsonValue::String(urn.to_string()));
        }
        if repeated {
            return Ok(record);
        }
        session.mark_described(href, identity);

        let defs = self.registry.merged_defs(resource.resource_type());
        for def in defs.serializable() {
            let value = match resource.get(def.accessor_name()).or_else(|| def.default.clone()) {
                Some(value) => value,
                None => continue,
            };
            record.insert(def.name.clone(), self.tree_value(&value, &prefix)?);
        }
        Ok(record)
    }

    /// Records for a collection, sharing one session.
    pub fn encode_tree_all(
        &self,
        resources: &[Arc<dyn Resource>],
        options: EncodeOptions,
    ) -> Result<Vec<TreeRecord>> {
        let mut session = TreeSession::new(options);
        resources
            .iter()
            .map(|r| self.encode_tree(r.as_ref(), &mut session))
            .collect()
    }

    fn tree_value(&self, value: &Value, prefix: &str) -> Result<JsonValue> {
        match value {
            Value::List(items) => items
                .iter()
                .map(|item| self.tree_value(item, prefix))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            Value::Ref(id) => {
                let target = self.resolve(*id)?;
                Ok(JsonValue::Object(self.short_record(target.as_ref(), prefix)))
            }
            scalar => Ok(JsonValue::String(scalar.to_string())),
        }
    }
}

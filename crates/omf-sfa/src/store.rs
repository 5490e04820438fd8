// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-memory resource store.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::gurn::Gurn;
use crate::resource::{Resource, ResourceStore};

#[derive(Default)]
struct Tables {
    resources: HashMap<Uuid, Arc<dyn Resource>>,
    /// insertion order, for stable listings
    order: Vec<Uuid>,
    urns: HashMap<String, Uuid>,
}

impl Tables {
    fn check(&self, resource: &dyn Resource, batch: &HashMap<String, Uuid>) -> Result<()> {
        if let Some(urn) = resource.urn() {
            let key = urn.to_string();
            let owner = batch.get(&key).or_else(|| self.urns.get(&key));
            if let Some(owner) = owner {
                if *owner != resource.identity() {
                    bail!("URN '{}' already bound to resource {}", key, owner);
                }
            }
        }
        Ok(())
    }

    fn insert(&mut self, resource: Box<dyn Resource>) -> Arc<dyn Resource> {
        let id = resource.identity();
        let resource: Arc<dyn Resource> = Arc::from(resource);

        if let Some(previous) = self.resources.get(&id) {
            if let Some(old) = previous.urn() {
                self.urns.remove(&old.to_string());
            }
        } else {
            self.order.push(id);
        }
        if let Some(urn) = resource.urn() {
            self.urns.insert(urn.to_string(), id);
        }
        self.resources.insert(id, Arc::clone(&resource));
        resource
    }
}

/// Resource store backed by hash maps.
///
/// Saves are copy-on-write: readers holding a snapshot never observe a
/// partially applied update, and [`save_all`](ResourceStore::save_all)
/// validates the whole batch before inserting any of it.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a resource, returning it if present.
    pub fn remove(&self, id: Uuid) -> Option<Arc<dyn Resource>> {
        let mut tables = self.tables.write();
        let removed = tables.resources.remove(&id)?;
        tables.order.retain(|i| *i != id);
        if let Some(urn) = removed.urn() {
            tables.urns.remove(&urn.to_string());
        }
        Some(removed)
    }

    /// Drop everything (for testing).
    pub fn clear(&self) {
        *self.tables.write() = Tables::default();
    }
}

impl ResourceStore for MemoryStore {
    fn find_by_identity(&self, id: Uuid) -> Option<Arc<dyn Resource>> {
        self.tables.read().resources.get(&id).cloned()
    }

    fn find_by_urn(&self, urn: &Gurn) -> Option<Arc<dyn Resource>> {
        let tables = self.tables.read();
        let id = tables.urns.get(&urn.to_string())?;
        tables.resources.get(id).cloned()
    }

    fn save(&self, resource: Box<dyn Resource>) -> Result<Arc<dyn Resource>> {
        let mut tables = self.tables.write();
        tables.check(resource.as_ref(), &HashMap::new())?;
        Ok(tables.insert(resource))
    }

    fn save_all(&self, resources: Vec<Box<dyn Resource>>) -> Result<Vec<Arc<dyn Resource>>> {
        let mut tables = self.tables.write();

        let mut batch = HashMap::new();
        for resource in &resources {
            tables.check(resource.as_ref(), &batch)?;
            if let Some(urn) = resource.urn() {
                batch.insert(urn.to_string(), resource.identity());
            }
        }

        Ok(resources.into_iter().map(|r| tables.insert(r)).collect())
    }

    fn all(&self) -> Vec<Arc<dyn Resource>> {
        let tables = self.tables.read();
        tables
            .order
            .iter()
            .filter_map(|id| tables.resources.get(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interface, Node};

    fn node(name: &str) -> Box<dyn Resource> {
        Box::new(Node::new(name).with_urn(Gurn::create(name, "testbed", "node")))
    }

    #[test]
    fn test_save_and_find() {
        let store = MemoryStore::new();
        let saved = store.save(node("node1")).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.find_by_identity(saved.identity()).is_some());
        let urn = Gurn::create("node1", "testbed", "node");
        assert_eq!(
            store.find_by_urn(&urn).unwrap().identity(),
            saved.identity()
        );
    }

    #[test]
    fn test_urn_conflict_rejected() {
        let store = MemoryStore::new();
        store.save(node("node1")).unwrap();
        assert!(store.save(node("node1")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_all_is_atomic() {
        let store = MemoryStore::new();
        let batch = vec![
            Box::new(Interface::new("node1:if0")) as Box<dyn Resource>,
            node("node2"),
            node("node2"),
        ];
        assert!(store.save_all(batch).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_keeps_order_and_reindexes() {
        let store = MemoryStore::new();
        let a = store.save(node("a")).unwrap();
        store.save(node("b")).unwrap();

        let mut copy = a.clone_resource();
        copy.set("component_id", "urn:publicid:IDN+testbed+node+a2".into())
            .unwrap();
        store.save(copy).unwrap();

        let names: Vec<String> = store
            .all()
            .iter()
            .filter_map(|r| r.urn().map(|u| u.short_name().to_string()))
            .collect();
        assert_eq!(names, vec!["a2", "b"]);
        assert!(store
            .find_by_urn(&Gurn::create("a", "testbed", "node"))
            .is_none());
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        let a = store.save(node("a")).unwrap();
        assert!(store.remove(a.identity()).is_some());
        assert!(store.is_empty());
        assert!(store.remove(a.identity()).is_none());
    }
}

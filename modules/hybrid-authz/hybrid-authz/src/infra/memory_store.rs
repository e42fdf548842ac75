//! Process-local [`ResourceStore`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use hybrid_authz_sdk::{Identity, NewResource, Resource, ResourceRef, ResourceStore, StoreError};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    /// Keyed by row id, so iteration is creation order.
    by_id: BTreeMap<i64, Resource>,
    index: HashMap<ResourceRef, i64>,
}

/// Resource records held in memory. Lost on restart.
///
/// Row ids are sequential; public references are random UUIDs.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    rows: RwLock<Rows>,
}

impl InMemoryResourceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn create(&self, data: NewResource, owner: &Identity) -> Result<Resource, StoreError> {
        let mut rows = self.rows.write();
        rows.next_id += 1;
        let resource = Resource {
            id: rows.next_id,
            resource_ref: ResourceRef::generate(),
            name: data.name,
            owner: owner.clone(),
        };
        rows.index.insert(resource.resource_ref.clone(), resource.id);
        rows.by_id.insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn delete(&self, resource: &ResourceRef) -> Result<(), StoreError> {
        let mut rows = self.rows.write();
        let id = rows
            .index
            .remove(resource)
            .ok_or_else(|| StoreError::NotFound(resource.clone()))?;
        rows.by_id.remove(&id);
        Ok(())
    }

    async fn rename(&self, resource: &ResourceRef, name: String) -> Result<Resource, StoreError> {
        let mut rows = self.rows.write();
        let id = *rows
            .index
            .get(resource)
            .ok_or_else(|| StoreError::NotFound(resource.clone()))?;
        let row = rows
            .by_id
            .get_mut(&id)
            .ok_or_else(|| StoreError::Internal(format!("index points at missing row {id}")))?;
        row.name = name;
        Ok(row.clone())
    }

    async fn find_by_ref(&self, resource: &ResourceRef) -> Result<Option<Resource>, StoreError> {
        let rows = self.rows.read();
        Ok(rows
            .index
            .get(resource)
            .and_then(|id| rows.by_id.get(id))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Resource>, StoreError> {
        Ok(self.rows.read().by_id.values().cloned().collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::new("alice@example.com").unwrap()
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_random_refs() {
        let store = InMemoryResourceStore::new();

        let a = store.create(NewResource::new("a"), &alice()).await.unwrap();
        let b = store.create(NewResource::new("b"), &alice()).await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_ne!(a.resource_ref, b.resource_ref);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn list_is_creation_order() {
        let store = InMemoryResourceStore::new();
        for name in ["c", "a", "b"] {
            store.create(NewResource::new(name), &alice()).await.unwrap();
        }

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = InMemoryResourceStore::new();
        let r = store.create(NewResource::new("a"), &alice()).await.unwrap();

        store.delete(&r.resource_ref).await.unwrap();
        let again = store.delete(&r.resource_ref).await;

        assert_eq!(again, Err(StoreError::NotFound(r.resource_ref.clone())));
        assert!(store.find_by_ref(&r.resource_ref).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rename_keeps_identity() {
        let store = InMemoryResourceStore::new();
        let r = store.create(NewResource::new("a"), &alice()).await.unwrap();

        let renamed = store.rename(&r.resource_ref, "z".to_owned()).await.unwrap();

        assert_eq!(renamed.id, r.id);
        assert_eq!(renamed.name, "z");
        assert_eq!(
            store.find_by_ref(&r.resource_ref).await.unwrap().unwrap().name,
            "z"
        );
    }
}

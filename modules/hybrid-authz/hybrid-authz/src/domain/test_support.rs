//! Scripted collaborators shared by the domain unit tests.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::must_use_candidate)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use hybrid_authz_sdk::{
    BackendUnavailable, Identity, NewResource, Relation, RelationshipBackendClient, Resource,
    ResourceRef, ResourceStore, StoreError,
};
use parking_lot::Mutex;

use crate::infra::InMemoryResourceStore;

pub fn id(s: &str) -> Identity {
    Identity::new(s).unwrap()
}

pub fn rref(s: &str) -> ResourceRef {
    ResourceRef::new(s).unwrap()
}

/// Tuple store following the reference model (viewer implied by editor and
/// owner) with fault injection and call counters.
#[derive(Default)]
pub struct ScriptedBackend {
    tuples: Mutex<HashSet<(String, Relation, String)>>,
    fail_all: AtomicBool,
    fail_writes: AtomicBool,
    lose_write_acks: AtomicBool,
    truncate_batches: AtomicBool,
    failing_checks: Mutex<HashSet<String>>,
    check_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    write_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call fails.
    pub fn failing() -> Arc<Self> {
        let backend = Self::new();
        backend.fail_all.store(true, Ordering::SeqCst);
        backend
    }

    pub fn seed(&self, identity: &str, relation: Relation, resource: &str) {
        self.tuples
            .lock()
            .insert((identity.to_owned(), relation, resource.to_owned()));
    }

    pub fn has(&self, identity: &str, relation: Relation, resource: &str) -> bool {
        self.tuples
            .lock()
            .contains(&(identity.to_owned(), relation, resource.to_owned()))
    }

    pub fn tuple_count(&self) -> usize {
        self.tuples.lock().len()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Writes are applied but reported as timed out.
    pub fn lose_write_acks(&self) {
        self.lose_write_acks.store(true, Ordering::SeqCst);
    }

    pub fn truncate_batches(&self) {
        self.truncate_batches.store(true, Ordering::SeqCst);
    }

    pub fn fail_checks_on(&self, resource: &str) {
        self.failing_checks.lock().insert(resource.to_owned());
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.check_calls() + self.batch_calls() + self.write_calls() + self.delete_calls()
    }

    fn ensure_up(&self) -> Result<(), BackendUnavailable> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(BackendUnavailable::new("connection refused"));
        }
        Ok(())
    }

    fn holds(&self, identity: &Identity, relation: Relation, resource: &ResourceRef) -> bool {
        let tuples = self.tuples.lock();
        let direct = |r: Relation| {
            tuples.contains(&(
                identity.as_str().to_owned(),
                r,
                resource.as_str().to_owned(),
            ))
        };
        match relation {
            Relation::Viewer => {
                direct(Relation::Viewer) || direct(Relation::Editor) || direct(Relation::Owner)
            }
            other => direct(other),
        }
    }
}

#[async_trait]
impl RelationshipBackendClient for ScriptedBackend {
    async fn check(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<bool, BackendUnavailable> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_up()?;
        if self.failing_checks.lock().contains(resource.as_str()) {
            return Err(BackendUnavailable::new("timeout"));
        }
        Ok(self.holds(identity, relation, resource))
    }

    async fn write(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_up()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendUnavailable::new("write rejected"));
        }
        self.seed(identity.as_str(), relation, resource.as_str());
        if self.lose_write_acks.load(Ordering::SeqCst) {
            return Err(BackendUnavailable::new("no response within 2000ms"));
        }
        Ok(())
    }

    async fn delete(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_up()?;
        self.tuples.lock().remove(&(
            identity.as_str().to_owned(),
            relation,
            resource.as_str().to_owned(),
        ));
        Ok(())
    }

    async fn batch_check(
        &self,
        identity: &Identity,
        relation: Relation,
        resources: &[ResourceRef],
    ) -> Result<Vec<bool>, BackendUnavailable> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_up()?;
        let mut out: Vec<bool> = resources
            .iter()
            .map(|r| self.holds(identity, relation, r))
            .collect();
        if self.truncate_batches.load(Ordering::SeqCst) {
            out.pop();
        }
        Ok(out)
    }
}

/// In-memory store whose `create` and `delete` can be made to fail, or
/// whose records can vanish before `delete` reaches them.
#[derive(Default)]
pub struct ScriptedStore {
    inner: InMemoryResourceStore,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    vanish_on_delete: AtomicBool,
    delete_calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// `delete` finds the record already gone.
    pub fn vanish_on_delete(&self) {
        self.vanish_on_delete.store(true, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl ResourceStore for ScriptedStore {
    async fn create(&self, data: NewResource, owner: &Identity) -> Result<Resource, StoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Internal("disk full".to_owned()));
        }
        self.inner.create(data, owner).await
    }

    async fn delete(&self, resource: &ResourceRef) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Internal("database locked".to_owned()));
        }
        if self.vanish_on_delete.load(Ordering::SeqCst) {
            self.inner.delete(resource).await?;
            return Err(StoreError::NotFound(resource.clone()));
        }
        self.inner.delete(resource).await
    }

    async fn rename(&self, resource: &ResourceRef, name: String) -> Result<Resource, StoreError> {
        self.inner.rename(resource, name).await
    }

    async fn find_by_ref(&self, resource: &ResourceRef) -> Result<Option<Resource>, StoreError> {
        self.inner.find_by_ref(resource).await
    }

    async fn list_all(&self) -> Result<Vec<Resource>, StoreError> {
        self.inner.list_all().await
    }
}

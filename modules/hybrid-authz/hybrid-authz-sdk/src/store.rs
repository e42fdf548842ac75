//! Resource persistence collaborator.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{Identity, ResourceRef};

/// A persisted, shareable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Store-local row id. Sequential, never used for lookups from outside.
    pub id: i64,
    /// Public, non-guessable reference.
    #[serde(rename = "uuid")]
    pub resource_ref: ResourceRef,
    pub name: String,
    /// Identity that created the resource.
    pub owner: Identity,
}

/// Data needed to persist a new resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    pub name: String,
}

impl NewResource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Storage of resource records. Schema and backing database are up to the
/// implementation.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Persist a resource and assign it a fresh [`ResourceRef`].
    ///
    /// # Errors
    ///
    /// [`StoreError::Internal`] on storage failure.
    async fn create(&self, data: NewResource, owner: &Identity) -> Result<Resource, StoreError>;

    /// Delete a resource record.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if there is no such resource.
    async fn delete(&self, resource: &ResourceRef) -> Result<(), StoreError>;

    /// Replace a resource's display name.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if there is no such resource.
    async fn rename(&self, resource: &ResourceRef, name: String) -> Result<Resource, StoreError>;

    /// Look a resource up by its public reference.
    ///
    /// # Errors
    ///
    /// [`StoreError::Internal`] on storage failure.
    async fn find_by_ref(&self, resource: &ResourceRef) -> Result<Option<Resource>, StoreError>;

    /// All resources in creation order.
    ///
    /// # Errors
    ///
    /// [`StoreError::Internal`] on storage failure.
    async fn list_all(&self) -> Result<Vec<Resource>, StoreError>;
}

//! Client traits for the hybrid authorizer.

use async_trait::async_trait;

use crate::error::BackendUnavailable;
use crate::models::{Action, Decision, Identity, Relation, ResourceRef};

/// Contract of the external relationship-based authorization backend.
///
/// Implementations are the only code that knows the backend's request and
/// response shapes. Every call is a single remote round-trip with no
/// implicit retry; callers own the retry policy. Any failure is reported as
/// [`BackendUnavailable`] and must never be turned into `false` here.
#[async_trait]
pub trait RelationshipBackendClient: Send + Sync {
    /// Does `identity` hold `relation` on `resource`?
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] if the backend could not answer.
    async fn check(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<bool, BackendUnavailable>;

    /// Store the tuple `(identity, relation, resource)`.
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] if the write was not acknowledged.
    async fn write(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable>;

    /// Remove the tuple `(identity, relation, resource)`.
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] if the delete was not acknowledged.
    async fn delete(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable>;

    /// Check `relation` for `identity` on every resource in one round-trip.
    ///
    /// `result[i]` answers `resources[i]`; the returned vector always has the
    /// same length as `resources`.
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] if any item could not be answered.
    async fn batch_check(
        &self,
        identity: &Identity,
        relation: Relation,
        resources: &[ResourceRef],
    ) -> Result<Vec<bool>, BackendUnavailable>;
}

/// Decision API consumed by enforcement points.
///
/// Infallible by signature: backend faults come back as
/// [`crate::DenyReason::Unavailable`], never as an allow.
#[async_trait]
pub trait AuthorizerClient: Send + Sync {
    /// Decide whether `identity` may perform `action` on `resource`.
    async fn decide(
        &self,
        identity: &Identity,
        action: Action,
        resource: Option<&ResourceRef>,
    ) -> Decision;
}

//! Relationship tuple lifecycle over the backend client.

use std::sync::Arc;

use hybrid_authz_sdk::{BackendUnavailable, Identity, Relation, RelationshipBackendClient, ResourceRef};

use super::error::{BackendOp, PermissionServiceError};

fn fault(op: BackendOp) -> impl FnOnce(BackendUnavailable) -> PermissionServiceError {
    move |source| {
        tracing::warn!(operation = %op, error = %source, "relationship backend call failed");
        PermissionServiceError::BackendOperation { op, source }
    }
}

/// Grant, revoke and check relationship tuples.
///
/// Wraps backend faults with the operation name; never turns a fault into
/// `false`. The single exception is [`Self::check_each`], which callers opt
/// into explicitly.
#[derive(Clone)]
pub struct PermissionService {
    backend: Arc<dyn RelationshipBackendClient>,
}

impl PermissionService {
    #[must_use]
    pub fn new(backend: Arc<dyn RelationshipBackendClient>) -> Self {
        Self { backend }
    }

    /// Does `identity` hold `relation` on `resource`?
    ///
    /// # Errors
    ///
    /// [`PermissionServiceError::BackendOperation`] with `op = check`.
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource, relation = %relation))]
    pub async fn check(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
        relation: Relation,
    ) -> Result<bool, PermissionServiceError> {
        self.backend
            .check(identity, relation, resource)
            .await
            .map_err(fault(BackendOp::Check))
    }

    /// Write the tuple `(identity, relation, resource)`.
    ///
    /// # Errors
    ///
    /// [`PermissionServiceError::BackendOperation`] with `op = grant`.
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource, relation = %relation))]
    pub async fn grant(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
        relation: Relation,
    ) -> Result<(), PermissionServiceError> {
        self.backend
            .write(identity, relation, resource)
            .await
            .map_err(fault(BackendOp::Grant))?;
        tracing::info!("relation granted");
        Ok(())
    }

    /// Delete the tuple `(identity, relation, resource)`.
    ///
    /// # Errors
    ///
    /// [`PermissionServiceError::BackendOperation`] with `op = revoke`.
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource, relation = %relation))]
    pub async fn revoke(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
        relation: Relation,
    ) -> Result<(), PermissionServiceError> {
        self.backend
            .delete(identity, relation, resource)
            .await
            .map_err(fault(BackendOp::Revoke))?;
        tracing::info!("relation revoked");
        Ok(())
    }

    /// Check `relation` on every resource with a single backend round-trip.
    ///
    /// `result[i]` answers `resources[i]`. An empty input makes no call.
    ///
    /// # Errors
    ///
    /// [`PermissionServiceError::BackendOperation`] with `op = batch_check`,
    /// including when the backend answers with the wrong number of results.
    #[tracing::instrument(skip_all, fields(identity = %identity, relation = %relation, count = resources.len()))]
    pub async fn batch_check(
        &self,
        identity: &Identity,
        resources: &[ResourceRef],
        relation: Relation,
    ) -> Result<Vec<bool>, PermissionServiceError> {
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .backend
            .batch_check(identity, relation, resources)
            .await
            .map_err(fault(BackendOp::BatchCheck))?;

        if results.len() != resources.len() {
            return Err(fault(BackendOp::BatchCheck)(BackendUnavailable::new(format!(
                "expected {} results, got {}",
                resources.len(),
                results.len()
            ))));
        }
        Ok(results)
    }

    /// One [`Self::check`] per resource, in order. A failed check counts as
    /// `false`.
    ///
    /// This is the conservative fallback for a failed [`Self::batch_check`]:
    /// it costs one round-trip per item and hides anything it could not
    /// confirm. Callers must choose it explicitly.
    pub async fn check_each(
        &self,
        identity: &Identity,
        resources: &[ResourceRef],
        relation: Relation,
    ) -> Vec<bool> {
        let mut results = Vec::with_capacity(resources.len());
        for resource in resources {
            let allowed = self
                .check(identity, resource, relation)
                .await
                .unwrap_or(false);
            results.push(allowed);
        }
        results
    }
}

impl std::fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::test_support::{ScriptedBackend, id, rref};

    #[tokio::test]
    async fn grant_then_check() {
        let backend = ScriptedBackend::new();
        let svc = PermissionService::new(backend.clone());

        svc.grant(&id("alice"), &rref("r1"), Relation::Owner)
            .await
            .unwrap();

        assert!(svc.check(&id("alice"), &rref("r1"), Relation::Owner).await.unwrap());
        assert!(!svc.check(&id("bob"), &rref("r1"), Relation::Owner).await.unwrap());
    }

    #[tokio::test]
    async fn revoke_removes_tuple() {
        let backend = ScriptedBackend::new();
        backend.seed("bob", Relation::Viewer, "r1");
        let svc = PermissionService::new(backend.clone());

        svc.revoke(&id("bob"), &rref("r1"), Relation::Viewer)
            .await
            .unwrap();

        assert!(!svc.check(&id("bob"), &rref("r1"), Relation::Viewer).await.unwrap());
    }

    #[tokio::test]
    async fn faults_carry_operation_name() {
        let backend = ScriptedBackend::failing();
        let svc = PermissionService::new(backend);

        let check = svc.check(&id("a"), &rref("r"), Relation::Viewer).await;
        let grant = svc.grant(&id("a"), &rref("r"), Relation::Viewer).await;
        let revoke = svc.revoke(&id("a"), &rref("r"), Relation::Viewer).await;
        let batch = svc.batch_check(&id("a"), &[rref("r")], Relation::Viewer).await;

        assert_eq!(check.unwrap_err().op(), BackendOp::Check);
        assert_eq!(grant.unwrap_err().op(), BackendOp::Grant);
        assert_eq!(revoke.unwrap_err().op(), BackendOp::Revoke);
        let batch = batch.unwrap_err();
        assert_eq!(batch.op(), BackendOp::BatchCheck);
        assert!(batch.to_string().contains("batch_check"));
    }

    #[tokio::test]
    async fn batch_check_preserves_order() {
        let backend = ScriptedBackend::new();
        backend.seed("alice", Relation::Owner, "r1");
        backend.seed("alice", Relation::Owner, "r3");
        let svc = PermissionService::new(backend.clone());

        let forward = svc
            .batch_check(&id("alice"), &[rref("r1"), rref("r2"), rref("r3")], Relation::Viewer)
            .await
            .unwrap();
        let reversed = svc
            .batch_check(&id("alice"), &[rref("r3"), rref("r2"), rref("r1")], Relation::Viewer)
            .await
            .unwrap();

        assert_eq!(forward, vec![true, false, true]);
        assert_eq!(reversed, vec![true, false, true]);
        assert_eq!(backend.batch_calls(), 2);
        assert_eq!(backend.check_calls(), 0);
    }

    #[tokio::test]
    async fn batch_check_permutation_moves_results() {
        let backend = ScriptedBackend::new();
        backend.seed("alice", Relation::Viewer, "b");
        let svc = PermissionService::new(backend);

        let input = [rref("a"), rref("b"), rref("c")];
        let shuffled = [rref("b"), rref("c"), rref("a")];

        let first = svc.batch_check(&id("alice"), &input, Relation::Viewer).await.unwrap();
        let second = svc.batch_check(&id("alice"), &shuffled, Relation::Viewer).await.unwrap();

        assert_eq!(first, vec![false, true, false]);
        assert_eq!(second, vec![true, false, false]);
    }

    #[tokio::test]
    async fn empty_batch_makes_no_call() {
        let backend = ScriptedBackend::new();
        let svc = PermissionService::new(backend.clone());

        let out = svc.batch_check(&id("alice"), &[], Relation::Viewer).await.unwrap();

        assert!(out.is_empty());
        assert_eq!(backend.batch_calls(), 0);
    }

    #[tokio::test]
    async fn short_batch_answer_is_a_fault() {
        let backend = ScriptedBackend::new();
        backend.truncate_batches();
        let svc = PermissionService::new(backend);

        let err = svc
            .batch_check(&id("alice"), &[rref("r1"), rref("r2")], Relation::Viewer)
            .await
            .unwrap_err();

        assert_eq!(err.op(), BackendOp::BatchCheck);
    }

    #[tokio::test]
    async fn check_each_downgrades_failures_to_false() {
        let backend = ScriptedBackend::new();
        backend.seed("alice", Relation::Viewer, "r1");
        backend.seed("alice", Relation::Viewer, "r2");
        backend.fail_checks_on("r2");
        let svc = PermissionService::new(backend.clone());

        let out = svc
            .check_each(&id("alice"), &[rref("r1"), rref("r2"), rref("r3")], Relation::Viewer)
            .await;

        assert_eq!(out, vec![true, false, false]);
        assert_eq!(backend.check_calls(), 3);
    }
}

//! Resource creation paired with its owner tuple.

use std::sync::Arc;

use hybrid_authz_sdk::{Identity, NewResource, Relation, Resource, ResourceStore, StoreError};

use super::error::SagaError;
use super::permission_service::PermissionService;

/// Two-step saga: persist the resource, then grant `owner` to its creator.
///
/// If the grant fails the record is deleted again, so a caller never sees a
/// resource without an owner tuple. A grant that timed out may still have
/// landed, so the owner tuple is revoked afterwards on a best-effort basis. Not a distributed transaction: when the
/// compensating delete fails too, [`SagaError::CompensationFailed`] is
/// returned and must be escalated, not retried.
#[derive(Clone)]
pub struct ResourceOwnershipSaga {
    store: Arc<dyn ResourceStore>,
    permissions: Arc<PermissionService>,
}

impl ResourceOwnershipSaga {
    #[must_use]
    pub fn new(store: Arc<dyn ResourceStore>, permissions: Arc<PermissionService>) -> Self {
        Self { store, permissions }
    }

    /// Persist `data` and make `owner` its owner.
    ///
    /// # Errors
    ///
    /// - [`SagaError::Persist`] if the store rejected the record; nothing was granted
    /// - [`SagaError::GrantFailed`] if the grant failed and the record was removed
    /// - [`SagaError::CompensationFailed`] if the record could not be removed either
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub async fn create_with_ownership(
        &self,
        data: NewResource,
        owner: &Identity,
    ) -> Result<Resource, SagaError> {
        let resource = self
            .store
            .create(data, owner)
            .await
            .map_err(SagaError::Persist)?;

        let Err(grant) = self
            .permissions
            .grant(owner, &resource.resource_ref, Relation::Owner)
            .await
        else {
            tracing::debug!(resource = %resource.resource_ref, "resource created with owner");
            return Ok(resource);
        };

        tracing::warn!(
            resource = %resource.resource_ref,
            error = %grant,
            "owner grant failed, removing resource"
        );

        match self.store.delete(&resource.resource_ref).await {
            // Already gone counts as compensated.
            Ok(()) | Err(StoreError::NotFound(_)) => {
                if let Err(e) = self
                    .permissions
                    .revoke(owner, &resource.resource_ref, Relation::Owner)
                    .await
                {
                    tracing::warn!(
                        resource = %resource.resource_ref,
                        error = %e,
                        "owner revoke after compensation failed"
                    );
                }
                Err(SagaError::GrantFailed {
                    resource: resource.resource_ref,
                    source: grant,
                })
            }
            Err(compensation) => {
                tracing::error!(
                    resource = %resource.resource_ref,
                    grant_error = %grant,
                    compensation_error = %compensation,
                    "compensation failed: resource persisted without owner tuple"
                );
                Err(SagaError::CompensationFailed {
                    resource: resource.resource_ref,
                    grant,
                    compensation,
                })
            }
        }
    }
}

impl std::fmt::Debug for ResourceOwnershipSaga {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceOwnershipSaga")
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

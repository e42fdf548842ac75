use std::sync::Arc;

use hybrid_authz_sdk::{
    Action, AuthzError, EnforcementGate, Identity, NewResource, Relation, Resource, ResourceRef,
    ResourceStore, Role,
};
use serde::Serialize;

use super::permission_service::PermissionService;
use super::role_matrix::RoleMatrix;
use super::saga::ResourceOwnershipSaga;
use crate::config::ListFallback;

/// Longest accepted resource name, in characters.
pub const MAX_NAME_LEN: usize = 120;

/// Caller profile returned by [`ResourceService::whoami`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhoAmI {
    pub email: Identity,
    pub name: String,
    pub roles: Vec<Role>,
}

/// Resource management behind the enforcement gate.
///
/// Existence versus permission ordering is fixed per operation:
/// - `get` and `rename` check permission first, so a caller without access
///   cannot learn whether a reference exists.
/// - `share`, `unshare` and `delete` check existence first and answer
///   "not found" for unknown references regardless of the caller.
pub struct ResourceService {
    store: Arc<dyn ResourceStore>,
    gate: EnforcementGate,
    roles: Arc<RoleMatrix>,
    permissions: Arc<PermissionService>,
    saga: ResourceOwnershipSaga,
    list_fallback: ListFallback,
}

impl ResourceService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ResourceStore>,
        gate: EnforcementGate,
        roles: Arc<RoleMatrix>,
        permissions: Arc<PermissionService>,
        list_fallback: ListFallback,
    ) -> Self {
        let saga = ResourceOwnershipSaga::new(store.clone(), permissions.clone());
        Self {
            store,
            gate,
            roles,
            permissions,
            saga,
            list_fallback,
        }
    }

    /// Resources `identity` may read, in creation order.
    ///
    /// A role granting `read` sees everything without touching the backend.
    /// Everyone else is filtered with one batched `viewer` check.
    ///
    /// # Errors
    ///
    /// [`AuthzError::AuthorizationUnavailable`] if the batch fails under
    /// [`ListFallback::Strict`]; [`AuthzError::Store`] on store failure.
    #[tracing::instrument(skip_all, fields(identity = %identity))]
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Resource>, AuthzError> {
        let all = self.store.list_all().await?;
        if self.roles.permits(identity, Action::Read) {
            return Ok(all);
        }

        let refs: Vec<ResourceRef> = all.iter().map(|r| r.resource_ref.clone()).collect();
        let visible = match self
            .permissions
            .batch_check(identity, &refs, Relation::Viewer)
            .await
        {
            Ok(visible) => visible,
            Err(e) => match self.list_fallback {
                ListFallback::Strict => return Err(e.into()),
                ListFallback::Sequential => {
                    tracing::warn!(error = %e, count = refs.len(), "batch check failed, checking items one by one");
                    self.permissions
                        .check_each(identity, &refs, Relation::Viewer)
                        .await
                }
            },
        };

        Ok(all
            .into_iter()
            .zip(visible)
            .filter_map(|(resource, allowed)| allowed.then_some(resource))
            .collect())
    }

    /// Create a resource owned by `identity`.
    ///
    /// # Errors
    ///
    /// [`AuthzError::Validation`] for a bad name, gate rejections, or the
    /// saga's faults.
    #[tracing::instrument(skip_all, fields(identity = %identity))]
    pub async fn create(&self, identity: &Identity, name: &str) -> Result<Resource, AuthzError> {
        let name = validate_name(name)?;
        self.gate
            .enforce(identity, Action::Create, None, || async {
                self.saga
                    .create_with_ownership(NewResource::new(name), identity)
                    .await
                    .map_err(AuthzError::from)
            })
            .await
    }

    /// Fetch one resource. Permission is checked before existence.
    ///
    /// # Errors
    ///
    /// [`AuthzError::PermissionDenied`] before [`AuthzError::ResourceNotFound`].
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource))]
    pub async fn get(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
    ) -> Result<Resource, AuthzError> {
        self.gate
            .enforce(identity, Action::Read, Some(resource), || {
                self.require(resource)
            })
            .await
    }

    /// Rename a resource. Permission (`update`) is checked before existence.
    ///
    /// # Errors
    ///
    /// [`AuthzError::Validation`] for a bad name, then as for [`Self::get`].
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource))]
    pub async fn rename(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
        name: &str,
    ) -> Result<Resource, AuthzError> {
        let name = validate_name(name)?;
        self.gate
            .enforce(identity, Action::Update, Some(resource), || async {
                self.store
                    .rename(resource, name)
                    .await
                    .map_err(AuthzError::from)
            })
            .await
    }

    /// Give `target` the `relation` on `resource`. The acting identity needs
    /// `share` (held via the `owner` relation).
    ///
    /// # Errors
    ///
    /// [`AuthzError::ResourceNotFound`] before any permission check.
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource, target = %target, relation = %relation))]
    pub async fn share(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
        target: &Identity,
        relation: Relation,
    ) -> Result<(), AuthzError> {
        self.require(resource).await?;
        self.gate
            .enforce(identity, Action::Share, Some(resource), || async {
                self.permissions
                    .grant(target, resource, relation)
                    .await
                    .map_err(AuthzError::from)
            })
            .await
    }

    /// Take `relation` on `resource` away from `target`. Same gate as
    /// [`Self::share`].
    ///
    /// # Errors
    ///
    /// [`AuthzError::ResourceNotFound`] before any permission check.
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource, target = %target, relation = %relation))]
    pub async fn unshare(
        &self,
        identity: &Identity,
        resource: &ResourceRef,
        target: &Identity,
        relation: Relation,
    ) -> Result<(), AuthzError> {
        self.require(resource).await?;
        self.gate
            .enforce(identity, Action::Share, Some(resource), || async {
                self.permissions
                    .revoke(target, resource, relation)
                    .await
                    .map_err(AuthzError::from)
            })
            .await
    }

    /// Delete a resource. Existence is checked before permission.
    ///
    /// The creator's owner tuple is revoked afterwards on a best-effort
    /// basis; the record is already gone if that fails.
    ///
    /// # Errors
    ///
    /// [`AuthzError::ResourceNotFound`] before any permission check.
    #[tracing::instrument(skip_all, fields(identity = %identity, resource = %resource))]
    pub async fn delete(&self, identity: &Identity, resource: &ResourceRef) -> Result<(), AuthzError> {
        let existing = self.require(resource).await?;
        self.gate
            .enforce(identity, Action::Delete, Some(resource), || async {
                self.store.delete(resource).await.map_err(AuthzError::from)
            })
            .await?;

        if let Err(e) = self
            .permissions
            .revoke(&existing.owner, resource, Relation::Owner)
            .await
        {
            tracing::warn!(error = %e, owner = %existing.owner, "owner tuple left behind after delete");
        }
        Ok(())
    }

    /// Profile of the calling identity.
    #[must_use]
    pub fn whoami(&self, identity: &Identity) -> WhoAmI {
        WhoAmI {
            email: identity.clone(),
            name: identity.display_name(),
            roles: self.roles.roles_of(identity).into_iter().collect(),
        }
    }

    async fn require(&self, resource: &ResourceRef) -> Result<Resource, AuthzError> {
        self.store
            .find_by_ref(resource)
            .await?
            .ok_or_else(|| AuthzError::ResourceNotFound(resource.clone()))
    }
}

impl std::fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("list_fallback", &self.list_fallback)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<String, AuthzError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthzError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AuthzError::validation(format!(
            "name exceeds maximum length of {MAX_NAME_LEN}"
        )));
    }
    Ok(name.to_owned())
}

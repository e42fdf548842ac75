//! Two-tier decision: role matrix first, relationship backend second.

use std::sync::Arc;

use async_trait::async_trait;
use hybrid_authz_sdk::{
    Action, AllowedBy, AuthorizerClient, Decision, DenyReason, Identity, ResourceRef,
};

use super::permission_service::PermissionService;
use super::role_matrix::RoleMatrix;

/// Hybrid RBAC/ReBAC authorizer.
///
/// A role that permits the action wins immediately and the backend is never
/// contacted. Otherwise the action is mapped to its fallback relation and
/// checked live. A backend fault is a deny with
/// [`DenyReason::Unavailable`], never an allow.
#[derive(Debug, Clone)]
pub struct HybridAuthorizer {
    roles: Arc<RoleMatrix>,
    permissions: Arc<PermissionService>,
}

impl HybridAuthorizer {
    #[must_use]
    pub fn new(roles: Arc<RoleMatrix>, permissions: Arc<PermissionService>) -> Self {
        Self { roles, permissions }
    }

    #[must_use]
    pub fn roles(&self) -> &RoleMatrix {
        &self.roles
    }
}

#[async_trait]
impl AuthorizerClient for HybridAuthorizer {
    #[tracing::instrument(skip_all, fields(identity = %identity, action = %action))]
    async fn decide(
        &self,
        identity: &Identity,
        action: Action,
        resource: Option<&ResourceRef>,
    ) -> Decision {
        if self.roles.permits(identity, action) {
            tracing::debug!(tier = "role", "allow");
            return Decision::Allow(AllowedBy::Role);
        }

        let (Some(relation), Some(resource)) = (action.fallback_relation(), resource) else {
            tracing::debug!("deny: no role permits the action and no relationship fallback applies");
            return Decision::Deny(DenyReason::NoFallback);
        };

        match self.permissions.check(identity, resource, relation).await {
            Ok(true) => {
                tracing::debug!(tier = "relationship", %relation, %resource, "allow");
                Decision::Allow(AllowedBy::Relationship(relation))
            }
            Ok(false) => {
                tracing::debug!(%relation, %resource, "deny: relation not held");
                Decision::Deny(DenyReason::NotPermitted { relation })
            }
            Err(e) => Decision::Deny(DenyReason::Unavailable {
                detail: e.to_string(),
            }),
        }
    }
}

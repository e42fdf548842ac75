//! Hybrid `AuthZ` module wiring.

use std::sync::Arc;

use anyhow::Context;
use hybrid_authz_sdk::{AuthorizerClient, EnforcementGate, RelationshipBackendClient, ResourceStore};
use tracing::info;

use crate::config::HybridAuthzConfig;
use crate::domain::{HybridAuthorizer, PermissionService, ResourceService, RoleMatrix};

/// Hybrid `AuthZ` module.
///
/// Built once at startup from configuration plus the two external
/// collaborators: the relationship backend and the resource store. Every
/// component it hands out is shared and safe for concurrent use.
#[derive(Debug, Clone)]
pub struct HybridAuthz {
    roles: Arc<RoleMatrix>,
    permissions: Arc<PermissionService>,
    authorizer: Arc<HybridAuthorizer>,
    gate: EnforcementGate,
    resources: Arc<ResourceService>,
}

impl HybridAuthz {
    pub const MODULE_NAME: &'static str = "hybrid-authz";

    /// Wire the module.
    ///
    /// # Errors
    ///
    /// Fails if the role assignments in `cfg` are invalid.
    #[tracing::instrument(skip_all)]
    pub fn init(
        cfg: &HybridAuthzConfig,
        backend: Arc<dyn RelationshipBackendClient>,
        store: Arc<dyn ResourceStore>,
    ) -> anyhow::Result<Self> {
        info!("Initializing {} module", Self::MODULE_NAME);

        let roles = Arc::new(
            RoleMatrix::from_config(cfg).context("invalid role assignments")?,
        );
        let permissions = Arc::new(PermissionService::new(backend));
        let authorizer = Arc::new(HybridAuthorizer::new(roles.clone(), permissions.clone()));
        let gate = EnforcementGate::new(authorizer.clone());
        let resources = Arc::new(ResourceService::new(
            store,
            gate.clone(),
            roles.clone(),
            permissions.clone(),
            cfg.list_fallback,
        ));

        info!(
            assignments = cfg.assignments.len(),
            default_role = %cfg.default_role,
            list_fallback = ?cfg.list_fallback,
            "{} module initialized successfully",
            Self::MODULE_NAME
        );

        Ok(Self {
            roles,
            permissions,
            authorizer,
            gate,
            resources,
        })
    }

    #[must_use]
    pub fn roles(&self) -> Arc<RoleMatrix> {
        self.roles.clone()
    }

    #[must_use]
    pub fn permissions(&self) -> Arc<PermissionService> {
        self.permissions.clone()
    }

    /// Decision API for enforcement points outside this module.
    #[must_use]
    pub fn authorizer(&self) -> Arc<dyn AuthorizerClient> {
        self.authorizer.clone()
    }

    #[must_use]
    pub fn gate(&self) -> EnforcementGate {
        self.gate.clone()
    }

    #[must_use]
    pub fn resources(&self) -> Arc<ResourceService> {
        self.resources.clone()
    }
}

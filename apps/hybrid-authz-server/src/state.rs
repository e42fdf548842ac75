//! Wiring of the module and its backend from configuration.

use std::sync::Arc;

use anyhow::Context;
use hybrid_authz::{HybridAuthz, HybridAuthzConfig, InMemoryResourceStore};
use hybrid_authz_sdk::{Identity, RelationshipBackendClient, ResourceStore};
use openfga_backend_plugin::OpenFgaClient;
use static_rebac_plugin::Service as StaticRebac;

use crate::config::{AppConfig, BackendKind};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub module: HybridAuthz,
    pub default_identity: Identity,
    /// Set when the `OpenFGA` backend is active; used for readiness.
    pub fga: Option<Arc<OpenFgaClient>>,
}

impl AppState {
    /// Build the state, consuming the backend sections of `cfg`.
    ///
    /// # Errors
    ///
    /// Fails on a blank default identity or invalid role assignments.
    pub fn from_config(cfg: AppConfig) -> anyhow::Result<Self> {
        let default_identity =
            Identity::new(cfg.server.default_identity).context("invalid server.default_identity")?;

        let (backend, fga): (Arc<dyn RelationshipBackendClient>, Option<Arc<OpenFgaClient>>) = match cfg.backend {
            BackendKind::Static => (
                Arc::new(StaticRebac::from_config(&cfg.static_rebac)),
                None,
            ),
            BackendKind::Openfga => {
                let client = Arc::new(OpenFgaClient::new(cfg.openfga));
                (client.clone(), Some(client))
            }
        };
        tracing::info!(backend = %cfg.backend, "relationship backend selected");

        Self::with_backend(&cfg.hybrid_authz, backend, fga, default_identity)
    }

    /// Build the state around an explicit backend.
    ///
    /// # Errors
    ///
    /// Fails on invalid role assignments.
    pub fn with_backend(
        cfg: &HybridAuthzConfig,
        backend: Arc<dyn RelationshipBackendClient>,
        fga: Option<Arc<OpenFgaClient>>,
        default_identity: Identity,
    ) -> anyhow::Result<Self> {
        let store: Arc<dyn ResourceStore> = Arc::new(InMemoryResourceStore::new());
        let module = HybridAuthz::init(cfg, backend, store)?;
        Ok(Self {
            module,
            default_identity,
            fga,
        })
    }
}

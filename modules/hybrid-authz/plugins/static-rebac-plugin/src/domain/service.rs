//! Tuple store and model evaluation for the static `ReBAC` plugin.

use std::collections::HashSet;

use hybrid_authz_sdk::{Identity, PermissionTuple, Relation, ResourceRef};
use parking_lot::RwLock;

use crate::config::StaticRebacConfig;

/// In-memory relationship tuples.
///
/// Writes and deletes are idempotent, matching what a remote backend
/// guarantees for repeated tuple operations.
#[derive(Debug, Default)]
pub struct Service {
    tuples: RwLock<HashSet<PermissionTuple>>,
}

impl Service {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(cfg: &StaticRebacConfig) -> Self {
        let service = Self::new();
        service.tuples.write().extend(cfg.tuples.iter().cloned());
        tracing::info!(tuples = cfg.tuples.len(), "static relationship store seeded");
        service
    }

    /// Store a tuple. Returns `false` if it was already present.
    #[must_use]
    pub fn write(&self, tuple: PermissionTuple) -> bool {
        self.tuples.write().insert(tuple)
    }

    /// Remove a tuple. Returns `false` if it was not present.
    #[must_use]
    pub fn delete(&self, tuple: &PermissionTuple) -> bool {
        self.tuples.write().remove(tuple)
    }

    /// Evaluate `relation` under the reference model.
    #[must_use]
    pub fn check(&self, identity: &Identity, relation: Relation, resource: &ResourceRef) -> bool {
        let tuples = self.tuples.read();
        implied_by(relation).iter().any(|granting| {
            tuples.contains(&PermissionTuple::new(
                identity.clone(),
                *granting,
                resource.clone(),
            ))
        })
    }

    /// Snapshot of all stored tuples, in no particular order.
    #[must_use]
    pub fn tuples(&self) -> Vec<PermissionTuple> {
        self.tuples.read().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tuples.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stored relations that grant `relation`.
fn implied_by(relation: Relation) -> &'static [Relation] {
    match relation {
        Relation::Owner => &[Relation::Owner],
        Relation::Editor => &[Relation::Editor],
        Relation::Viewer => &[Relation::Viewer, Relation::Editor, Relation::Owner],
    }
}

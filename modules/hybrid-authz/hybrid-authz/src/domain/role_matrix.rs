//! Static role-to-action matrix.

use std::collections::{BTreeSet, HashMap};

use hybrid_authz_sdk::{Action, EmptyIdentifier, Identity, Role};

use crate::config::HybridAuthzConfig;

/// Coarse-grained permissions, independent of any resource.
///
/// Read-only after construction, so concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct RoleMatrix {
    permitted: HashMap<Role, BTreeSet<Action>>,
    assignments: HashMap<Identity, BTreeSet<Role>>,
    default_role: Role,
}

impl RoleMatrix {
    #[must_use]
    pub fn new(
        permitted: impl IntoIterator<Item = (Role, Vec<Action>)>,
        assignments: impl IntoIterator<Item = (Identity, Vec<Role>)>,
        default_role: Role,
    ) -> Self {
        Self {
            permitted: permitted
                .into_iter()
                .map(|(role, actions)| (role, actions.into_iter().collect()))
                .collect(),
            assignments: assignments
                .into_iter()
                .filter(|(_, roles)| !roles.is_empty())
                .map(|(identity, roles)| (identity, roles.into_iter().collect()))
                .collect(),
            default_role,
        }
    }

    /// Build the matrix from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdentifier`] if an assignment key is blank.
    pub fn from_config(cfg: &HybridAuthzConfig) -> Result<Self, EmptyIdentifier> {
        let assignments = cfg
            .assignments
            .iter()
            .map(|(id, roles)| Identity::new(id.as_str()).map(|identity| (identity, roles.clone())))
            .collect::<Result<Vec<_>, EmptyIdentifier>>()?;

        Ok(Self::new(
            cfg.roles.iter().map(|(r, a)| (*r, a.clone())),
            assignments,
            cfg.default_role,
        ))
    }

    /// Roles held by `identity`. Unknown identities hold only the default role.
    #[must_use]
    pub fn roles_of(&self, identity: &Identity) -> BTreeSet<Role> {
        self.assignments
            .get(identity)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([self.default_role]))
    }

    /// Actions `role` permits. Roles missing from the matrix permit nothing.
    #[must_use]
    pub fn permitted_actions(&self, role: Role) -> BTreeSet<Action> {
        self.permitted.get(&role).cloned().unwrap_or_default()
    }

    /// `true` iff any role held by `identity` permits `action`.
    #[must_use]
    pub fn permits(&self, identity: &Identity, action: Action) -> bool {
        self.roles_of(identity).into_iter().any(|role| {
            self.permitted
                .get(&role)
                .is_some_and(|actions| actions.contains(&action))
        })
    }
}

impl Default for RoleMatrix {
    fn default() -> Self {
        let cfg = HybridAuthzConfig::default();
        let assignments = cfg.assignments.into_iter().filter_map(|(id, roles)| {
            Identity::new(id).ok().map(|identity| (identity, roles))
        });
        Self::new(cfg.roles, assignments, cfg.default_role)
    }
}

//! Configuration for the hybrid authorizer.

use std::collections::BTreeMap;

use hybrid_authz_sdk::{Action, Role};
use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HybridAuthzConfig {
    /// Actions each role permits.
    pub roles: BTreeMap<Role, Vec<Action>>,

    /// Roles held by each identity. Identities not listed get `default_role`.
    pub assignments: BTreeMap<String, Vec<Role>>,

    /// Role assumed for identities without role data.
    pub default_role: Role,

    /// What listing does when the batched relationship check fails.
    pub list_fallback: ListFallback,
}

impl Default for HybridAuthzConfig {
    fn default() -> Self {
        let roles = BTreeMap::from([
            (
                Role::Admin,
                vec![Action::Create, Action::Read, Action::Update, Action::Delete],
            ),
            (Role::Editor, vec![Action::Create, Action::Read, Action::Update]),
            (Role::Viewer, vec![Action::Read]),
            (Role::Guest, vec![]),
        ]);
        let assignments = BTreeMap::from([
            ("alice@example.com".to_owned(), vec![Role::Admin]),
            ("bob@example.com".to_owned(), vec![Role::Viewer]),
            ("charlie@example.com".to_owned(), vec![Role::Guest]),
        ]);

        Self {
            roles,
            assignments,
            default_role: Role::Guest,
            list_fallback: ListFallback::Strict,
        }
    }
}

/// Behaviour of list operations when a batch check fails.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListFallback {
    /// Surface the fault.
    #[default]
    Strict,
    /// Retry as one check per item; items whose check fails are hidden.
    Sequential,
}

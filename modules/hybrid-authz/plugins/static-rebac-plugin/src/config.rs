//! Configuration for the static `ReBAC` plugin.

use hybrid_authz_sdk::PermissionTuple;
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRebacConfig {
    /// Tuples present at startup.
    pub tuples: Vec<PermissionTuple>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use hybrid_authz_sdk::Relation;

    use super::*;

    #[test]
    fn parses_seed_tuples() {
        let cfg: StaticRebacConfig = serde_json::from_value(serde_json::json!({
            "tuples": [
                { "identity": "bob@example.com", "relation": "viewer", "resource": "r1" }
            ]
        }))
        .unwrap();

        assert_eq!(cfg.tuples.len(), 1);
        assert_eq!(cfg.tuples[0].relation, Relation::Viewer);
    }

    #[test]
    fn rejects_blank_identity_in_seed() {
        let res = serde_json::from_value::<StaticRebacConfig>(serde_json::json!({
            "tuples": [{ "identity": "", "relation": "owner", "resource": "r1" }]
        }));
        assert!(res.is_err());
    }
}

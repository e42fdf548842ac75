//! Domain models for the hybrid authorizer.
//!
//! Two vocabularies live side by side here and must not be mixed up:
//! [`Action`] is what the role matrix understands, [`Relation`] is what the
//! relationship backend stores. [`Action::fallback_relation`] is the only
//! bridge between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EmptyIdentifier, UnknownVariant};

/// Object type used for resources in relationship tuples.
pub const RESOURCE_TYPE: &str = "resource";

/// Subject type used for identities in relationship tuples.
pub const USER_TYPE: &str = "user";

/// Opaque, already authenticated user reference (usually an email address).
///
/// Immutable for the lifetime of a request. The only invariant is that it is
/// not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a raw subject string.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdentifier`] if the value is empty or whitespace only.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyIdentifier> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyIdentifier { kind: "identity" });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-friendly name derived from the local part of an email-shaped
    /// identity (`alice@example.com` becomes `Alice`).
    #[must_use]
    pub fn display_name(&self) -> String {
        let local = self.0.split('@').next().unwrap_or_default();
        let mut chars = local.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = EmptyIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

/// Globally unique resource identifier.
///
/// Assigned by the resource store at creation time. Generated references
/// are random UUIDs so that they cannot be enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Wrap an existing resource reference.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdentifier`] if the value is empty or whitespace only.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyIdentifier> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyIdentifier {
                kind: "resource reference",
            });
        }
        Ok(Self(value))
    }

    /// Allocate a fresh, non-sequential reference.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ResourceRef {
    type Error = EmptyIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceRef> for String {
    fn from(value: ResourceRef) -> Self {
        value.0
    }
}

/// Coarse-grained role held by an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
    /// Fallback role for identities without role data. Grants nothing by default.
    Guest,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Editor, Self::Viewer, Self::Guest];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("role", s))
    }
}

/// Operation an identity attempts. This is the role matrix vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// Grant or revoke a relation on a resource for another identity.
    Share,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::Share,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Share => "share",
        }
    }

    /// Relation checked in the backend when no role permits this action.
    ///
    /// Fixed table, never inferred. `create` has no target resource and
    /// therefore no relationship fallback.
    #[must_use]
    pub fn fallback_relation(self) -> Option<Relation> {
        match self {
            Self::Create => None,
            Self::Read => Some(Relation::Viewer),
            Self::Update => Some(Relation::Editor),
            Self::Delete | Self::Share => Some(Relation::Owner),
        }
    }

    /// Whether enforcing this action needs a target resource reference.
    #[must_use]
    pub fn requires_resource(self) -> bool {
        !matches!(self, Self::Create)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("action", s))
    }
}

/// Relation stored in the relationship backend. This is the tuple vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Owner,
    Editor,
    Viewer,
}

impl Relation {
    pub const ALL: [Self; 3] = [Self::Owner, Self::Editor, Self::Viewer];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("relation", s))
    }
}

/// "`identity` holds `relation` on `resource`".
///
/// The unit of grant and revoke in the relationship backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionTuple {
    pub identity: Identity,
    pub relation: Relation,
    pub resource: ResourceRef,
}

impl PermissionTuple {
    #[must_use]
    pub fn new(identity: Identity, relation: Relation, resource: ResourceRef) -> Self {
        Self {
            identity,
            relation,
            resource,
        }
    }

    /// Subject key on the wire: `user:<identity>`.
    #[must_use]
    pub fn user_key(&self) -> String {
        format!("{USER_TYPE}:{}", self.identity)
    }

    /// Object key on the wire: `resource:<ref>`.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{RESOURCE_TYPE}:{}", self.resource)
    }
}

/// Which tier granted an allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedBy {
    /// A role held by the identity permits the action.
    Role,
    /// The backend confirmed the relation on the target resource.
    Relationship(Relation),
}

/// Why a decision denied access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No role permits the action and the backend holds no granting tuple.
    NotPermitted { relation: Relation },
    /// No role permits the action and there is nothing to fall back to
    /// (the action has no relation, or no resource was given).
    NoFallback,
    /// The relationship check could not be completed. Never an allow.
    Unavailable { detail: String },
}

/// Result of an authorization evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(AllowedBy),
    Deny(DenyReason),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// `true` when the deny comes from a backend fault rather than policy.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Deny(DenyReason::Unavailable { .. }))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn identity_rejects_blank() {
        assert!(Identity::new("").is_err());
        assert!(Identity::new("   ").is_err());
        assert_eq!(
            Identity::new("alice@example.com").unwrap().as_str(),
            "alice@example.com"
        );
    }

    #[test]
    fn identity_display_name_uses_local_part() {
        let id = Identity::new("charlie@example.com").unwrap();
        assert_eq!(id.display_name(), "Charlie");

        let plain = Identity::new("svc-backup").unwrap();
        assert_eq!(plain.display_name(), "Svc-backup");
    }

    #[test]
    fn identity_deserialize_validates() {
        let ok: Identity = serde_json::from_str("\"bob@example.com\"").unwrap();
        assert_eq!(ok.as_str(), "bob@example.com");

        let err = serde_json::from_str::<Identity>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn generated_refs_are_unique_uuids() {
        let a = ResourceRef::generate();
        let b = ResourceRef::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn fallback_table_is_fixed() {
        assert_eq!(Action::Create.fallback_relation(), None);
        assert_eq!(Action::Read.fallback_relation(), Some(Relation::Viewer));
        assert_eq!(Action::Update.fallback_relation(), Some(Relation::Editor));
        assert_eq!(Action::Delete.fallback_relation(), Some(Relation::Owner));
        assert_eq!(Action::Share.fallback_relation(), Some(Relation::Owner));
    }

    #[test]
    fn only_create_works_without_resource() {
        for action in Action::ALL {
            assert_eq!(action.requires_resource(), action != Action::Create);
        }
    }

    #[test]
    fn vocabularies_parse_from_wire_names() {
        assert_eq!("viewer".parse::<Relation>().unwrap(), Relation::Viewer);
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        assert_eq!("guest".parse::<Role>().unwrap(), Role::Guest);

        let err = "reader".parse::<Relation>().unwrap_err();
        assert_eq!(err.to_string(), "unknown relation 'reader'");
    }

    #[test]
    fn tuple_wire_keys() {
        let tuple = PermissionTuple::new(
            Identity::new("alice@example.com").unwrap(),
            Relation::Owner,
            ResourceRef::new("r1").unwrap(),
        );
        assert_eq!(tuple.user_key(), "user:alice@example.com");
        assert_eq!(tuple.object_key(), "resource:r1");
    }

    #[test]
    fn unavailable_deny_is_distinguishable() {
        let unavailable = Decision::Deny(DenyReason::Unavailable {
            detail: "timeout".to_owned(),
        });
        let denied = Decision::Deny(DenyReason::NotPermitted {
            relation: Relation::Owner,
        });

        assert!(!unavailable.is_allowed());
        assert!(unavailable.is_unavailable());
        assert!(!denied.is_unavailable());
        assert!(Decision::Allow(AllowedBy::Role).is_allowed());
    }
}

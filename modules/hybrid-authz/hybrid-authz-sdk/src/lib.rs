#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Hybrid `AuthZ` SDK
//!
//! Public contract of the hybrid authorizer:
//!
//! - [`Identity`], [`Role`], [`Action`], [`Relation`], [`ResourceRef`],
//!   [`PermissionTuple`], [`Decision`] - data model
//! - [`RelationshipBackendClient`] - contract of the external relationship backend
//! - [`AuthorizerClient`] - decision API consumed by enforcement points
//! - [`ResourceStore`] - resource persistence collaborator
//! - [`AuthzError`], [`BackendUnavailable`], [`StoreError`] - error taxonomy
//! - [`pep`] - enforcement helpers ([`EnforcementGate`])
//!
//! ## Usage
//!
//! ```ignore
//! use hybrid_authz_sdk::{Action, AuthzError, EnforcementGate};
//!
//! // Built once at startup, shared by every handler.
//! let gate = EnforcementGate::new(authorizer);
//!
//! let resource = gate
//!     .enforce(&identity, Action::Read, Some(&resource_ref), || async {
//!         store.find_by_ref(&resource_ref).await?.ok_or(AuthzError::ResourceNotFound(resource_ref.clone()))
//!     })
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod pep;
pub mod store;

pub use api::{AuthorizerClient, RelationshipBackendClient};
pub use error::{AuthzError, BackendUnavailable, EmptyIdentifier, StoreError, UnknownVariant};
pub use models::{
    Action, AllowedBy, Decision, DenyReason, Identity, PermissionTuple, Relation, ResourceRef,
    Role,
};
pub use pep::{EnforcementGate, EnforcerError};
pub use store::{NewResource, Resource, ResourceStore};

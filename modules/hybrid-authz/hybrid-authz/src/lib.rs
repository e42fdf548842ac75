//! Hybrid `AuthZ` Module
//!
//! Decision engine combining a static role matrix (RBAC) with relationship
//! checks against an external backend (ReBAC), plus the services that keep
//! ownership tuples in step with resource lifecycle.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::{HybridAuthzConfig, ListFallback};
pub use domain::{
    BackendOp, HybridAuthorizer, PermissionService, PermissionServiceError,
    ResourceOwnershipSaga, ResourceService, RoleMatrix, SagaError, WhoAmI,
};
pub use infra::InMemoryResourceStore;
pub use module::HybridAuthz;

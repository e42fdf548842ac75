//! Domain layer for the hybrid authorizer.

pub mod authorizer;
pub mod error;
pub mod permission_service;
pub mod resources;
pub mod role_matrix;
pub mod saga;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorizer::HybridAuthorizer;
pub use error::{BackendOp, PermissionServiceError, SagaError};
pub use permission_service::PermissionService;
pub use resources::{ResourceService, WhoAmI};
pub use role_matrix::RoleMatrix;
pub use saga::ResourceOwnershipSaga;

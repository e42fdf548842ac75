//! Domain errors for the hybrid authorizer.

use std::fmt;

use hybrid_authz_sdk::{AuthzError, BackendUnavailable, ResourceRef, StoreError};

/// Backend operation that failed, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp {
    Check,
    Grant,
    Revoke,
    BatchCheck,
}

impl BackendOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Grant => "grant",
            Self::Revoke => "revoke",
            Self::BatchCheck => "batch_check",
        }
    }
}

impl fmt::Display for BackendOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from [`super::PermissionService`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionServiceError {
    /// The backend failed while running `op`.
    #[error("relationship backend {op} failed: {source}")]
    BackendOperation {
        op: BackendOp,
        #[source]
        source: BackendUnavailable,
    },
}

impl PermissionServiceError {
    #[must_use]
    pub fn op(&self) -> BackendOp {
        match self {
            Self::BackendOperation { op, .. } => *op,
        }
    }
}

impl From<PermissionServiceError> for AuthzError {
    fn from(e: PermissionServiceError) -> Self {
        Self::AuthorizationUnavailable(e.to_string())
    }
}

/// Errors from [`super::ResourceOwnershipSaga`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SagaError {
    /// The resource could not be persisted; nothing was granted.
    #[error("failed to persist resource: {0}")]
    Persist(#[source] StoreError),

    /// The owner tuple could not be written. The resource record was
    /// removed again.
    #[error("failed to grant ownership of {resource}: {source}")]
    GrantFailed {
        resource: ResourceRef,
        #[source]
        source: PermissionServiceError,
    },

    /// The owner tuple could not be written and the resource record could
    /// not be removed either. Needs operator attention; do not retry.
    #[error(
        "failed to grant ownership of {resource} ({grant}) and failed to remove the record ({compensation})"
    )]
    CompensationFailed {
        resource: ResourceRef,
        grant: PermissionServiceError,
        compensation: StoreError,
    },
}

impl From<SagaError> for AuthzError {
    fn from(e: SagaError) -> Self {
        match e {
            SagaError::Persist(store) => store.into(),
            SagaError::GrantFailed { source, .. } => source.into(),
            SagaError::CompensationFailed {
                resource,
                grant,
                compensation,
            } => Self::CompensationFailure {
                resource,
                detail: format!("grant: {grant}; compensation: {compensation}"),
            },
        }
    }
}

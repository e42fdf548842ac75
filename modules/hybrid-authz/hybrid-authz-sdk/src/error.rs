//! Error types for the hybrid authorizer.

use thiserror::Error;

use crate::models::ResourceRef;

/// A required identifier (identity, resource reference) was blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must not be empty")]
pub struct EmptyIdentifier {
    pub kind: &'static str,
}

/// A string did not name a known role, action or relation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// The relationship backend could not answer.
///
/// Single fault kind for every transport or protocol failure: connection
/// errors, non-success statuses, malformed bodies, exceeded deadlines.
/// It is never an answer of "no".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("relationship backend unavailable: {reason}")]
pub struct BackendUnavailable {
    pub reason: String,
}

impl BackendUnavailable {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors reported by a [`crate::ResourceStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No resource with this reference exists.
    #[error("resource {0} not found")]
    NotFound(ResourceRef),

    /// The store failed for any other reason.
    #[error("resource store failure: {0}")]
    Internal(String),
}

/// Caller-facing rejections.
///
/// This is what protected operations return to the routing layer. The
/// denied and unavailable cases stay distinct all the way out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// The request is malformed (for example a missing resource reference).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Policy denies the action. Says nothing about whether the target exists.
    #[error("access denied")]
    PermissionDenied,

    /// The target resource does not exist.
    #[error("resource {0} not found")]
    ResourceNotFound(ResourceRef),

    /// The decision could not be made because the backend failed.
    #[error("authorization unavailable: {0}")]
    AuthorizationUnavailable(String),

    /// Saga compensation failed; the resource record and the tuple store
    /// disagree and an operator has to reconcile them.
    #[error("compensation failed for resource {resource}: {detail}")]
    CompensationFailure { resource: ResourceRef, detail: String },

    /// The resource store failed.
    #[error("resource store failure: {0}")]
    Store(String),
}

impl AuthzError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<StoreError> for AuthzError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(resource) => Self::ResourceNotFound(resource),
            StoreError::Internal(msg) => Self::Store(msg),
        }
    }
}

impl From<EmptyIdentifier> for AuthzError {
    fn from(e: EmptyIdentifier) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<UnknownVariant> for AuthzError {
    fn from(e: UnknownVariant) -> Self {
        Self::Validation(e.to_string())
    }
}

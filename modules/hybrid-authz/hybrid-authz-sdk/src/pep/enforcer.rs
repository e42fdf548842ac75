//! Policy Enforcement Point (`PEP`) object.
//!
//! [`EnforcementGate`] is composed explicitly at the routing layer around each
//! protected operation. The identity, action and resource reference are part
//! of the call, not dug out of the wrapped operation's arguments.
//!
//! Constructed once during service initialisation with the authorizer.

use std::future::Future;
use std::sync::Arc;

use crate::api::AuthorizerClient;
use crate::error::AuthzError;
use crate::models::{Action, AllowedBy, Decision, DenyReason, Identity, ResourceRef};

/// Rejection produced by the gate before the wrapped operation runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnforcerError {
    /// The action targets a resource but no reference was supplied.
    #[error("action '{action}' requires a resource reference")]
    MissingResource { action: Action },

    /// Policy denied the action.
    #[error("access denied")]
    Denied { reason: DenyReason },

    /// The decision could not be made.
    #[error("authorization unavailable: {detail}")]
    Unavailable { detail: String },
}

impl From<EnforcerError> for AuthzError {
    fn from(e: EnforcerError) -> Self {
        match e {
            EnforcerError::MissingResource { .. } => Self::Validation(e.to_string()),
            EnforcerError::Denied { .. } => Self::PermissionDenied,
            EnforcerError::Unavailable { detail } => Self::AuthorizationUnavailable(detail),
        }
    }
}

/// Policy Enforcement Point.
///
/// Holds the authorizer. Cloneable and cheap to pass around (`Arc` inside).
/// Has no side effects beyond the authorization call itself.
///
/// # Example
///
/// ```ignore
/// let gate = EnforcementGate::new(authorizer.clone());
///
/// gate.enforce(&identity, Action::Delete, Some(&resource_ref), || async {
///     store.delete(&resource_ref).await.map_err(AuthzError::from)
/// })
/// .await?;
/// ```
#[derive(Clone)]
pub struct EnforcementGate {
    authorizer: Arc<dyn AuthorizerClient>,
}

impl EnforcementGate {
    /// Create a new gate.
    #[must_use]
    pub fn new(authorizer: Arc<dyn AuthorizerClient>) -> Self {
        Self { authorizer }
    }

    /// Validate inputs and obtain a decision, without running anything.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::MissingResource`] if `action` needs a resource and none was given
    /// - [`EnforcerError::Denied`] on a policy deny
    /// - [`EnforcerError::Unavailable`] if the backend failed during the decision
    pub async fn authorize(
        &self,
        identity: &Identity,
        action: Action,
        resource: Option<&ResourceRef>,
    ) -> Result<AllowedBy, EnforcerError> {
        if action.requires_resource() && resource.is_none() {
            return Err(EnforcerError::MissingResource { action });
        }

        match self.authorizer.decide(identity, action, resource).await {
            Decision::Allow(via) => Ok(via),
            Decision::Deny(DenyReason::Unavailable { detail }) => {
                tracing::warn!(
                    identity = %identity,
                    action = %action,
                    detail = %detail,
                    "authorization decision unavailable"
                );
                Err(EnforcerError::Unavailable { detail })
            }
            Decision::Deny(reason) => {
                tracing::debug!(identity = %identity, action = %action, ?reason, "access denied");
                Err(EnforcerError::Denied { reason })
            }
        }
    }

    /// Run `operation` only if the decision allows it.
    ///
    /// The operation's result is returned unchanged. Gate rejections are
    /// converted into the operation's error type.
    ///
    /// # Errors
    ///
    /// Any [`EnforcerError`] from [`Self::authorize`] (converted into `E`),
    /// or whatever the operation itself returns.
    pub async fn enforce<T, E, F, Fut>(
        &self,
        identity: &Identity,
        action: Action,
        resource: Option<&ResourceRef>,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<EnforcerError>,
    {
        self.authorize(identity, action, resource)
            .await
            .map_err(E::from)?;
        operation().await
    }
}

impl std::fmt::Debug for EnforcementGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnforcementGate").finish_non_exhaustive()
    }
}

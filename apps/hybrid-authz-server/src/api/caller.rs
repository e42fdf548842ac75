//! Caller identity extraction.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hybrid_authz_sdk::{AuthzError, Identity};

use super::problem::Problem;
use crate::state::AppState;

/// Header carrying the already-authenticated caller.
pub const USER_HEADER: &str = "x-user-email";

/// Identity of the caller: the `x-user-email` header, or the configured
/// default identity when the header is absent.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_HEADER) else {
            return Ok(Self(state.default_identity.clone()));
        };
        let raw = value
            .to_str()
            .map_err(|_| Problem::bad_request(format!("{USER_HEADER} must be visible ASCII")))?;
        Identity::new(raw.trim())
            .map(Self)
            .map_err(|e| Problem::from(AuthzError::from(e)))
    }
}

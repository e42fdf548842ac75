//! `application/problem+json` error bodies.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use hybrid_authz_sdk::AuthzError;
use serde::Serialize;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Error body returned by every handler.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(skip)]
    status_code: StatusCode,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            kind: "about:blank",
            title: status.canonical_reason().unwrap_or("Error"),
            status: status.as_u16(),
            detail: detail.into(),
            status_code: status,
        }
    }

    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl From<AuthzError> for Problem {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Validation(msg) => Self::bad_request(msg),
            AuthzError::PermissionDenied => Self::new(StatusCode::FORBIDDEN, "access denied"),
            e @ AuthzError::ResourceNotFound(_) => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            AuthzError::AuthorizationUnavailable(detail) => {
                tracing::warn!(%detail, "authorization unavailable");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "authorization service unavailable, retry later",
                )
            }
            e @ AuthzError::CompensationFailure { .. } => {
                tracing::error!(error = %e, "request left inconsistent state");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AuthzError::Store(detail) => {
                tracing::error!(%detail, "resource store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "resource store failure")
            }
        }
    }
}

impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (
            self.status_code,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
            )],
            Json(self),
        )
            .into_response()
    }
}

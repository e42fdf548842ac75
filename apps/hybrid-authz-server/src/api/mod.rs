//! HTTP surface under `/api/v1`.

pub mod caller;
pub mod handlers;
pub mod problem;

use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use caller::{Caller, USER_HEADER};
pub use problem::Problem;

use crate::config::CorsConfig;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// Routes without middleware, relative to [`API_PREFIX`].
#[must_use]
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/resources",
            get(handlers::list_resources).post(handlers::create_resource),
        )
        .route(
            "/resources/{ref}",
            get(handlers::get_resource)
                .put(handlers::rename_resource)
                .delete(handlers::delete_resource),
        )
        .route(
            "/resources/{ref}/share",
            post(handlers::share_resource).delete(handlers::unshare_resource),
        )
        .route("/users/me", get(handlers::whoami))
        .with_state(state)
}

/// Full application router: routes plus tracing and optional CORS.
///
/// # Errors
///
/// Fails if a configured CORS origin is not a valid header value.
pub fn router(state: AppState, cors: &CorsConfig) -> anyhow::Result<Router> {
    let mut router = Router::new().nest(API_PREFIX, routes(state));
    if cors.enabled {
        router = router.layer(build_cors_layer(cors)?);
    }
    Ok(router.layer(TraceLayer::new_for_http()))
}

fn build_cors_layer(cfg: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origin = if cfg.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = cfg
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_HEADER)])
        .allow_credentials(cfg.allow_credentials)
        .max_age(Duration::from_secs(cfg.max_age_seconds)))
}

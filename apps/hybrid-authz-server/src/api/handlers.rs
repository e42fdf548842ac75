//! Route handlers. Each one resolves the caller, delegates to the resource
//! service and maps the outcome to HTTP.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use hybrid_authz::WhoAmI;
use hybrid_authz_sdk::{Identity, Relation, Resource, ResourceRef};
use serde::{Deserialize, Serialize};

use super::caller::Caller;
use super::problem::Problem;
use crate::state::AppState;

type ApiResult<T> = Result<T, Problem>;

#[derive(Debug, Deserialize)]
pub struct ResourceBody {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareBody {
    /// Identity receiving (or losing) the relation.
    #[serde(alias = "user")]
    pub user_email: Identity,
    /// Defaults to `viewer`.
    #[serde(default)]
    pub relation: Option<Relation>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub message: &'static str,
    pub resource_uuid: ResourceRef,
    pub shared_with: Identity,
    pub relation: Relation,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_model_id: Option<String>,
}

fn parse_ref(raw: String) -> ApiResult<ResourceRef> {
    ResourceRef::try_from(raw).map_err(|e| Problem::bad_request(e.to_string()))
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Health>> {
    let Some(fga) = &state.fga else {
        return Ok(Json(Health {
            status: "ok",
            backend: "static",
            authorization_model_id: None,
        }));
    };
    let model = fga.read_latest_authorization_model().await.map_err(|e| {
        tracing::warn!(error = %e, "readiness check failed");
        Problem::new(StatusCode::SERVICE_UNAVAILABLE, "relationship backend unreachable")
    })?;
    Ok(Json(Health {
        status: "ok",
        backend: "openfga",
        authorization_model_id: model,
    }))
}

pub async fn list_resources(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> ApiResult<Json<Vec<Resource>>> {
    let resources = state.module.resources().list(&identity).await?;
    Ok(Json(resources))
}

pub async fn create_resource(
    State(state): State<AppState>,
    Caller(identity): Caller,
    body: Result<Json<ResourceBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    let Json(body) = body?;
    let resource = state.module.resources().create(&identity, &body.name).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(raw): Path<String>,
) -> ApiResult<Json<Resource>> {
    let resource = parse_ref(raw)?;
    Ok(Json(state.module.resources().get(&identity, &resource).await?))
}

pub async fn rename_resource(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(raw): Path<String>,
    body: Result<Json<ResourceBody>, JsonRejection>,
) -> ApiResult<Json<Resource>> {
    let resource = parse_ref(raw)?;
    let Json(body) = body?;
    let renamed = state
        .module
        .resources()
        .rename(&identity, &resource, &body.name)
        .await?;
    Ok(Json(renamed))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(raw): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let resource = parse_ref(raw)?;
    state.module.resources().delete(&identity, &resource).await?;
    Ok(Json(MessageResponse {
        message: "Resource deleted successfully",
    }))
}

pub async fn share_resource(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(raw): Path<String>,
    body: Result<Json<ShareBody>, JsonRejection>,
) -> ApiResult<Json<ShareResponse>> {
    let resource = parse_ref(raw)?;
    let Json(body) = body?;
    let relation = body.relation.unwrap_or(Relation::Viewer);
    state
        .module
        .resources()
        .share(&identity, &resource, &body.user_email, relation)
        .await?;
    Ok(Json(ShareResponse {
        message: "Resource shared successfully",
        resource_uuid: resource,
        shared_with: body.user_email,
        relation,
    }))
}

pub async fn unshare_resource(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(raw): Path<String>,
    body: Result<Json<ShareBody>, JsonRejection>,
) -> ApiResult<Json<ShareResponse>> {
    let resource = parse_ref(raw)?;
    let Json(body) = body?;
    let relation = body.relation.unwrap_or(Relation::Viewer);
    state
        .module
        .resources()
        .unshare(&identity, &resource, &body.user_email, relation)
        .await?;
    Ok(Json(ShareResponse {
        message: "Resource access revoked",
        resource_uuid: resource,
        shared_with: body.user_email,
        relation,
    }))
}

pub async fn whoami(State(state): State<AppState>, Caller(identity): Caller) -> Json<WhoAmI> {
    Json(state.module.resources().whoami(&identity))
}

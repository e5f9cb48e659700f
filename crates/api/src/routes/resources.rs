//! Resource routes, mounted once per resource kind.
//!
//! `/boats`, `/picture-boats`, `/security-boats`, `/transport-vehicles`,
//! `/helpers` and `/guard-camp-workers` share these handlers; the kind
//! reaches them as a request extension.

use axum::{
    Extension, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, extract::Json, middleware::AuthUser};
use shootlogix_core::resource::ResourceKind;
use shootlogix_db::{
    ResourceRepository,
    entities::resources,
    repositories::{CreateResourceInput, UpdateResourceInput},
};

/// Creates the resource routes for every kind.
pub fn routes() -> Router<AppState> {
    ResourceKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            let collection = format!("/productions/{{production_id}}/{}", kind.resource_segment());
            let item = format!("{collection}/{{resource_id}}");
            router
                .route(
                    &collection,
                    get(list_resources)
                        .post(create_resource)
                        .layer(Extension(kind)),
                )
                .route(
                    &item,
                    get(get_resource)
                        .put(update_resource)
                        .delete(delete_resource)
                        .layer(Extension(kind)),
                )
        })
}

async fn list_resources(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<resources::Model>>> {
    Ok(Json(
        ResourceRepository::new(state.conn())
            .list(production_id, kind)
            .await?,
    ))
}

async fn get_resource(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path((production_id, resource_id)): Path<(i32, i32)>,
) -> ApiResult<Json<resources::Model>> {
    Ok(Json(
        ResourceRepository::new(state.conn())
            .get(production_id, kind, resource_id)
            .await?,
    ))
}

async fn create_resource(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateResourceInput>,
) -> ApiResult<(StatusCode, Json<resources::Model>)> {
    let resource = ResourceRepository::new(state.conn())
        .create(production_id, kind, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn update_resource(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path((production_id, resource_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateResourceInput>,
) -> ApiResult<Json<resources::Model>> {
    Ok(Json(
        ResourceRepository::new(state.conn())
            .update(production_id, kind, resource_id, payload)
            .await?,
    ))
}

/// Deleting a resource also deletes its assignments.
async fn delete_resource(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    auth: AuthUser,
    Path((production_id, resource_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    ResourceRepository::new(state.conn())
        .delete(production_id, kind, resource_id)
        .await?;
    info!(production_id, resource_id, kind = kind.as_str(), by = auth.user_id(), "Resource deleted");
    Ok(Json(json!({ "deleted": resource_id })))
}

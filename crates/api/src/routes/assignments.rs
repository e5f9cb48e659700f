//! Assignment routes, mounted once per resource kind.
//!
//! Every write goes through the repository's history log so it can be
//! undone from `/undo`.

use axum::{
    Extension, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, extract::Json, middleware::AuthUser};
use shootlogix_core::resource::ResourceKind;
use shootlogix_db::{
    AssignmentRepository,
    repositories::{AssignmentDetail, CreateAssignmentInput, UpdateAssignmentInput},
};

/// Creates the assignment routes for every kind.
pub fn routes() -> Router<AppState> {
    ResourceKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            let collection =
                format!("/productions/{{production_id}}/{}", kind.assignment_segment());
            router
                .route(
                    &collection,
                    get(list_assignments)
                        .post(create_assignment)
                        .layer(Extension(kind)),
                )
                .route(
                    &format!("{collection}/{{assignment_id}}"),
                    get(get_assignment)
                        .put(update_assignment)
                        .delete(delete_assignment)
                        .layer(Extension(kind)),
                )
                .route(
                    &format!("{collection}/function/{{function_id}}"),
                    delete(clear_function).layer(Extension(kind)),
                )
        })
}

async fn list_assignments(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<AssignmentDetail>>> {
    Ok(Json(
        AssignmentRepository::new(state.conn())
            .list(production_id, kind)
            .await?,
    ))
}

async fn get_assignment(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path((production_id, assignment_id)): Path<(i32, i32)>,
) -> ApiResult<Json<AssignmentDetail>> {
    Ok(Json(
        AssignmentRepository::new(state.conn())
            .detail(production_id, kind, assignment_id)
            .await?,
    ))
}

async fn create_assignment(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    auth: AuthUser,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateAssignmentInput>,
) -> ApiResult<(StatusCode, Json<AssignmentDetail>)> {
    let detail = AssignmentRepository::new(state.conn())
        .create(production_id, kind, payload, Some(auth.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_assignment(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    auth: AuthUser,
    Path((production_id, assignment_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateAssignmentInput>,
) -> ApiResult<Json<AssignmentDetail>> {
    Ok(Json(
        AssignmentRepository::new(state.conn())
            .update(
                production_id,
                kind,
                assignment_id,
                payload,
                Some(auth.user_id()),
            )
            .await?,
    ))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    auth: AuthUser,
    Path((production_id, assignment_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    AssignmentRepository::new(state.conn())
        .delete(production_id, kind, assignment_id, Some(auth.user_id()))
        .await?;
    Ok(Json(json!({ "deleted": assignment_id })))
}

/// DELETE .../function/{function_id} - Remove every assignment of this
/// kind on one function.
async fn clear_function(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    auth: AuthUser,
    Path((production_id, function_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    let deleted = AssignmentRepository::new(state.conn())
        .clear_function(production_id, kind, function_id, Some(auth.user_id()))
        .await?;
    info!(production_id, function_id, kind = kind.as_str(), deleted, "Function assignments cleared");
    Ok(Json(json!({ "deleted": deleted })))
}

//! Boat function routes.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, extract::Json, middleware::AuthUser};
use shootlogix_db::{
    FunctionRepository,
    entities::functions,
    repositories::{CreateFunctionInput, UpdateFunctionInput},
};

/// Creates the function routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productions/{production_id}/boat-functions",
            get(list_functions).post(create_function),
        )
        .route(
            "/productions/{production_id}/boat-functions/{function_id}",
            get(get_function)
                .put(update_function)
                .delete(delete_function),
        )
}

/// Listing filter.
#[derive(Debug, Deserialize)]
pub struct FunctionQuery {
    /// Only functions in this context.
    pub context: Option<String>,
}

async fn list_functions(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Query(query): Query<FunctionQuery>,
) -> ApiResult<Json<Vec<functions::Model>>> {
    Ok(Json(
        FunctionRepository::new(state.conn())
            .list(production_id, query.context.as_deref())
            .await?,
    ))
}

async fn get_function(
    State(state): State<AppState>,
    Path((production_id, function_id)): Path<(i32, i32)>,
) -> ApiResult<Json<functions::Model>> {
    Ok(Json(
        FunctionRepository::new(state.conn())
            .get(production_id, function_id)
            .await?,
    ))
}

async fn create_function(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateFunctionInput>,
) -> ApiResult<(StatusCode, Json<functions::Model>)> {
    let function = FunctionRepository::new(state.conn())
        .create(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(function)))
}

async fn update_function(
    State(state): State<AppState>,
    Path((production_id, function_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateFunctionInput>,
) -> ApiResult<Json<functions::Model>> {
    Ok(Json(
        FunctionRepository::new(state.conn())
            .update(production_id, function_id, payload)
            .await?,
    ))
}

/// Deleting a function also deletes its assignments.
async fn delete_function(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((production_id, function_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    FunctionRepository::new(state.conn())
        .delete(production_id, function_id)
        .await?;
    info!(production_id, function_id, by = auth.user_id(), "Function deleted");
    Ok(Json(json!({ "deleted": function_id })))
}

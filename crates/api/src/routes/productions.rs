//! Production and department routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::Json,
    middleware::AuthUser,
};
use shootlogix_db::{
    ProductionRepository,
    entities::{departments, productions},
    repositories::{CreateProductionInput, UpdateProductionInput},
};

/// Creates the production routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/productions", get(list_productions).post(create_production))
        .route(
            "/productions/{production_id}",
            get(get_production)
                .put(update_production)
                .delete(delete_production),
        )
        .route(
            "/productions/{production_id}/departments",
            get(list_departments),
        )
}

/// GET /productions - Productions visible to the caller.
async fn list_productions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<productions::Model>>> {
    let repo = ProductionRepository::new(state.conn());
    let list = if auth.is_admin() {
        repo.list_all().await?
    } else {
        repo.list_for_user(auth.user_id()).await?
    };
    Ok(Json(list))
}

/// POST /productions - Create a production and seed its departments.
async fn create_production(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductionInput>,
) -> ApiResult<(StatusCode, Json<productions::Model>)> {
    let production = ProductionRepository::new(state.conn())
        .create(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(production)))
}

/// GET /productions/{id}
async fn get_production(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<productions::Model>> {
    ProductionRepository::new(state.conn())
        .find_by_id(production_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Production not found"))
}

/// PUT /productions/{id}
async fn update_production(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<UpdateProductionInput>,
) -> ApiResult<Json<productions::Model>> {
    let production = ProductionRepository::new(state.conn())
        .update(production_id, payload)
        .await?;
    Ok(Json(production))
}

/// DELETE /productions/{id} - Deletes the production and everything in it.
async fn delete_production(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    ProductionRepository::new(state.conn())
        .delete(production_id)
        .await?;
    info!(production_id, by = auth.user_id(), "Production deleted");
    Ok(Json(json!({ "deleted": production_id })))
}

/// GET /productions/{id}/departments
async fn list_departments(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<departments::Model>>> {
    let departments = ProductionRepository::new(state.conn())
        .list_departments(production_id)
        .await?;
    Ok(Json(departments))
}

//! Shooting day (PDT) routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use crate::{AppState, error::ApiResult, extract::Json};
use shootlogix_db::{
    ShootingDayRepository,
    entities::shooting_days,
    repositories::{CreateShootingDayInput, UpdateShootingDayInput},
};

/// Creates the shooting day routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productions/{production_id}/shooting-days",
            get(list_days).post(create_day),
        )
        .route(
            "/productions/{production_id}/shooting-days/{day_id}",
            get(get_day).put(update_day).delete(delete_day),
        )
}

async fn list_days(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<shooting_days::Model>>> {
    Ok(Json(
        ShootingDayRepository::new(state.conn())
            .list(production_id)
            .await?,
    ))
}

async fn get_day(
    State(state): State<AppState>,
    Path((production_id, day_id)): Path<(i32, i32)>,
) -> ApiResult<Json<shooting_days::Model>> {
    Ok(Json(
        ShootingDayRepository::new(state.conn())
            .get(production_id, day_id)
            .await?,
    ))
}

async fn create_day(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateShootingDayInput>,
) -> ApiResult<(StatusCode, Json<shooting_days::Model>)> {
    let day = ShootingDayRepository::new(state.conn())
        .create(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(day)))
}

async fn update_day(
    State(state): State<AppState>,
    Path((production_id, day_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateShootingDayInput>,
) -> ApiResult<Json<shooting_days::Model>> {
    Ok(Json(
        ShootingDayRepository::new(state.conn())
            .update(production_id, day_id, payload)
            .await?,
    ))
}

async fn delete_day(
    State(state): State<AppState>,
    Path((production_id, day_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    ShootingDayRepository::new(state.conn())
        .delete(production_id, day_id)
        .await?;
    Ok(Json(json!({ "deleted": day_id })))
}

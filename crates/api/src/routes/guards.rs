//! Guard post and guard schedule routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde_json::{Value, json};

use crate::{AppState, error::ApiResult, extract::Json};
use shootlogix_db::{
    GuardRepository,
    entities::{guard_location_schedules, guard_posts},
    repositories::{CreateGuardPostInput, UpdateGuardPostInput, UpsertGuardScheduleInput},
};

/// Creates the guard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productions/{production_id}/guard-posts",
            get(list_posts).post(create_post),
        )
        .route(
            "/productions/{production_id}/guard-posts/{post_id}",
            put(update_post).delete(delete_post),
        )
        .route(
            "/productions/{production_id}/guard-schedules",
            get(list_schedules).post(upsert_schedule),
        )
        .route(
            "/productions/{production_id}/guard-schedules/{schedule_id}",
            delete(delete_schedule),
        )
}

async fn list_posts(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<guard_posts::Model>>> {
    Ok(Json(
        GuardRepository::new(state.conn())
            .list_posts(production_id)
            .await?,
    ))
}

async fn create_post(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateGuardPostInput>,
) -> ApiResult<(StatusCode, Json<guard_posts::Model>)> {
    let post = GuardRepository::new(state.conn())
        .create_post(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path((production_id, post_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateGuardPostInput>,
) -> ApiResult<Json<guard_posts::Model>> {
    Ok(Json(
        GuardRepository::new(state.conn())
            .update_post(production_id, post_id, payload)
            .await?,
    ))
}

async fn delete_post(
    State(state): State<AppState>,
    Path((production_id, post_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    GuardRepository::new(state.conn())
        .delete_post(production_id, post_id)
        .await?;
    Ok(Json(json!({ "deleted": post_id })))
}

async fn list_schedules(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<guard_location_schedules::Model>>> {
    Ok(Json(
        GuardRepository::new(state.conn())
            .list_schedules(production_id)
            .await?,
    ))
}

/// POST /guard-schedules - Sets guards for one (location, date) cell.
async fn upsert_schedule(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<UpsertGuardScheduleInput>,
) -> ApiResult<Json<guard_location_schedules::Model>> {
    Ok(Json(
        GuardRepository::new(state.conn())
            .upsert_schedule(production_id, payload)
            .await?,
    ))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path((production_id, schedule_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    GuardRepository::new(state.conn())
        .delete_schedule(production_id, schedule_id)
        .await?;
    Ok(Json(json!({ "deleted": schedule_id })))
}

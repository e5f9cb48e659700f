//! Location site and P/F/W schedule routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, extract::Json, middleware::AuthUser};
use shootlogix_db::{
    LocationRepository,
    entities::{location_schedules, locations},
    repositories::{CreateLocationInput, UpdateLocationInput, UpsertLocationScheduleInput},
};

/// Creates the location routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productions/{production_id}/locations",
            get(list_sites).post(create_site),
        )
        .route(
            "/productions/{production_id}/locations/{location_id}",
            put(update_site).delete(delete_site),
        )
        .route(
            "/productions/{production_id}/location-schedules",
            get(list_schedules).post(upsert_schedule),
        )
        .route(
            "/productions/{production_id}/location-schedules/lock",
            put(lock_schedules),
        )
        .route(
            "/productions/{production_id}/location-schedules/{schedule_id}",
            delete(delete_schedule),
        )
}

/// Lock request body.
#[derive(Debug, Deserialize)]
pub struct LockRequest {
    /// Days to lock or unlock.
    #[serde(default)]
    pub dates: Vec<String>,
    /// Target state.
    pub locked: bool,
}

async fn list_sites(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<locations::Model>>> {
    Ok(Json(
        LocationRepository::new(state.conn())
            .list_sites(production_id)
            .await?,
    ))
}

async fn create_site(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateLocationInput>,
) -> ApiResult<(StatusCode, Json<locations::Model>)> {
    let site = LocationRepository::new(state.conn())
        .create_site(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(site)))
}

async fn update_site(
    State(state): State<AppState>,
    Path((production_id, location_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateLocationInput>,
) -> ApiResult<Json<locations::Model>> {
    Ok(Json(
        LocationRepository::new(state.conn())
            .update_site(production_id, location_id, payload)
            .await?,
    ))
}

async fn delete_site(
    State(state): State<AppState>,
    Path((production_id, location_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    LocationRepository::new(state.conn())
        .delete_site(production_id, location_id)
        .await?;
    Ok(Json(json!({ "deleted": location_id })))
}

async fn list_schedules(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<location_schedules::Model>>> {
    Ok(Json(
        LocationRepository::new(state.conn())
            .list_schedules(production_id)
            .await?,
    ))
}

/// POST /location-schedules - Sets one (location, date) cell.
async fn upsert_schedule(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<UpsertLocationScheduleInput>,
) -> ApiResult<Json<location_schedules::Model>> {
    Ok(Json(
        LocationRepository::new(state.conn())
            .upsert_schedule(production_id, payload)
            .await?,
    ))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path((production_id, schedule_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    LocationRepository::new(state.conn())
        .delete_schedule(production_id, schedule_id)
        .await?;
    Ok(Json(json!({ "deleted": schedule_id })))
}

/// PUT /location-schedules/lock - Locks or unlocks every cell on the given days.
async fn lock_schedules(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(production_id): Path<i32>,
    Json(payload): Json<LockRequest>,
) -> ApiResult<Json<Value>> {
    let updated = LocationRepository::new(state.conn())
        .set_locked(production_id, &payload.dates, payload.locked)
        .await?;
    info!(
        production_id,
        days = payload.dates.len(),
        locked = payload.locked,
        by = auth.user_id(),
        "Location schedule lock changed"
    );
    Ok(Json(json!({ "updated": updated, "locked": payload.locked })))
}

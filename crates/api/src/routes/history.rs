//! Assignment history and undo routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use shootlogix_db::{
    HistoryRepository,
    entities::history,
    repositories::{DEFAULT_HISTORY_LIMIT, UndoOutcome},
};

/// Creates the history routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/productions/{production_id}/history", get(list_history))
        .route("/productions/{production_id}/undo", post(undo))
}

/// History listing parameters.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries, 50 when omitted.
    pub limit: Option<u64>,
}

/// GET /productions/{id}/history - Newest entries first.
async fn list_history(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<history::Model>>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(
        HistoryRepository::new(state.conn())
            .list(production_id, limit)
            .await?,
    ))
}

/// POST /productions/{id}/undo - Reverts the newest assignment change.
async fn undo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let outcome = HistoryRepository::new(state.conn())
        .undo_latest(production_id)
        .await?;
    match outcome {
        UndoOutcome::Nothing => Ok(Json(json!({ "message": "Nothing to undo" }))),
        UndoOutcome::Undone { restored } => {
            info!(production_id, by = auth.user_id(), "Assignment change undone");
            Ok(Json(
                json!({ "message": "Undo successful", "restored": restored }),
            ))
        }
        UndoOutcome::Skipped { history_id } => Ok(Json(json!({
            "message": "Change no longer restorable, skipped",
            "skipped": history_id,
        }))),
    }
}

//! Budget overview and manual budget line routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, extract::Json, middleware::AuthUser};
use shootlogix_core::budget::BudgetReport;
use shootlogix_db::{
    BudgetRepository, entities::budget_lines, repositories::CreateBudgetLineInput,
};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/productions/{production_id}/budget", get(report))
        .route(
            "/productions/{production_id}/budget/lines",
            get(list_lines).post(create_line),
        )
        .route(
            "/productions/{production_id}/budget/lines/{line_id}",
            delete(delete_line),
        )
}

/// GET /budget - Every cost row with department subtotals.
async fn report(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<BudgetReport>> {
    Ok(Json(
        BudgetRepository::new(state.conn())
            .report(production_id)
            .await?,
    ))
}

async fn list_lines(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<budget_lines::Model>>> {
    Ok(Json(
        BudgetRepository::new(state.conn())
            .list_lines(production_id)
            .await?,
    ))
}

async fn create_line(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateBudgetLineInput>,
) -> ApiResult<(StatusCode, Json<budget_lines::Model>)> {
    let line = BudgetRepository::new(state.conn())
        .create_line(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

async fn delete_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((production_id, line_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    BudgetRepository::new(state.conn())
        .delete_line(production_id, line_id)
        .await?;
    info!(production_id, line_id, by = auth.user_id(), "Budget line deleted");
    Ok(Json(json!({ "deleted": line_id })))
}

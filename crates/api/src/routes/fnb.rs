//! Food and beverage routes.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiResult, extract::Json};
use shootlogix_core::budget::FnbBudget;
use shootlogix_db::{
    FnbRepository,
    entities::{fnb_categories, fnb_entries, fnb_items},
    repositories::{
        CreateFnbCategoryInput, CreateFnbItemInput, UpdateFnbCategoryInput, UpdateFnbItemInput,
        UpsertFnbEntryInput,
    },
};

/// Creates the FNB routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productions/{production_id}/fnb-categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/productions/{production_id}/fnb-categories/{category_id}",
            put(update_category).delete(delete_category),
        )
        .route(
            "/productions/{production_id}/fnb-items",
            get(list_items).post(create_item),
        )
        .route(
            "/productions/{production_id}/fnb-items/{item_id}",
            put(update_item).delete(delete_item),
        )
        .route(
            "/productions/{production_id}/fnb-entries",
            get(list_entries).post(upsert_entry),
        )
        .route(
            "/productions/{production_id}/fnb-entries/{entry_id}",
            delete(delete_entry),
        )
        .route("/productions/{production_id}/fnb-budget", get(budget))
}

/// Item listing filter.
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    /// Only items of this category.
    pub category_id: Option<i32>,
}

async fn list_categories(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<fnb_categories::Model>>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .list_categories(production_id)
            .await?,
    ))
}

async fn create_category(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateFnbCategoryInput>,
) -> ApiResult<(StatusCode, Json<fnb_categories::Model>)> {
    let category = FnbRepository::new(state.conn())
        .create_category(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Path((production_id, category_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateFnbCategoryInput>,
) -> ApiResult<Json<fnb_categories::Model>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .update_category(production_id, category_id, payload)
            .await?,
    ))
}

async fn delete_category(
    State(state): State<AppState>,
    Path((production_id, category_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    FnbRepository::new(state.conn())
        .delete_category(production_id, category_id)
        .await?;
    Ok(Json(json!({ "deleted": category_id })))
}

async fn list_items(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Query(query): Query<ItemQuery>,
) -> ApiResult<Json<Vec<fnb_items::Model>>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .list_items(production_id, query.category_id)
            .await?,
    ))
}

async fn create_item(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<CreateFnbItemInput>,
) -> ApiResult<(StatusCode, Json<fnb_items::Model>)> {
    let item = FnbRepository::new(state.conn())
        .create_item(production_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    Path((production_id, item_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateFnbItemInput>,
) -> ApiResult<Json<fnb_items::Model>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .update_item(production_id, item_id, payload)
            .await?,
    ))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((production_id, item_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    FnbRepository::new(state.conn())
        .delete_item(production_id, item_id)
        .await?;
    Ok(Json(json!({ "deleted": item_id })))
}

async fn list_entries(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<Vec<fnb_entries::Model>>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .list_entries(production_id)
            .await?,
    ))
}

/// POST /fnb-entries - Sets the quantity of one (item, type, date) cell.
async fn upsert_entry(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    Json(payload): Json<UpsertFnbEntryInput>,
) -> ApiResult<Json<fnb_entries::Model>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .upsert_entry(production_id, payload)
            .await?,
    ))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path((production_id, entry_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    FnbRepository::new(state.conn())
        .delete_entry(production_id, entry_id)
        .await?;
    Ok(Json(json!({ "deleted": entry_id })))
}

/// GET /fnb-budget - Purchase and consumption totals per category.
async fn budget(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<FnbBudget>> {
    Ok(Json(
        FnbRepository::new(state.conn())
            .budget(production_id)
            .await?,
    ))
}

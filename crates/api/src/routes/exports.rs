//! CSV and JSON exports.
//!
//! Files are named `{PRODUCTION}_{KIND}_{YYMMDD}.csv` and served as
//! attachments.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};
use shootlogix_core::{
    budget::{BOATS_CONTEXT, BudgetReport, FnbBudget, effective_estimate_rate},
    resource::ResourceKind,
};
use shootlogix_db::{
    AssignmentRepository, BudgetRepository, FnbRepository, ProductionRepository,
    repositories::AssignmentDetail,
};

const ASSIGNMENT_HEADER: [&str; 10] = [
    "Function",
    "Group",
    "Boat",
    "Vendor",
    "Start",
    "End",
    "Working Days",
    "Rate Estimate",
    "Amount Estimate",
    "Amount Actual",
];

const GLOBAL_HEADER: [&str; 11] = [
    "Department",
    "Name",
    "Boat/Resource",
    "Vendor",
    "Start",
    "End",
    "Working Days",
    "Unit Price",
    "Amount Estimate",
    "Amount Actual",
    "Source",
];

/// Creates the export routes.
pub fn routes() -> Router<AppState> {
    let router = Router::new()
        .route(
            "/productions/{production_id}/export/csv",
            get(assignments_csv).layer(Extension(ResourceKind::Boat)),
        )
        .route("/productions/{production_id}/export/json", get(boats_json))
        .route(
            "/productions/{production_id}/export/helpers/csv",
            get(assignments_csv).layer(Extension(ResourceKind::Helper)),
        )
        .route(
            "/productions/{production_id}/export/fnb-budget/csv",
            get(fnb_budget_csv),
        )
        .route(
            "/productions/{production_id}/export/budget-global",
            get(budget_global),
        );

    ResourceKind::ALL
        .into_iter()
        .filter_map(|kind| kind.export_segment().map(|segment| (kind, segment)))
        .fold(router, |router, (kind, segment)| {
            router.route(
                &format!("/productions/{{production_id}}/export/{segment}/csv"),
                get(assignments_csv).layer(Extension(kind)),
            )
        })
}

/// One exported assignment line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Function name.
    pub function: String,
    /// Function group.
    pub group: String,
    /// Resource display name.
    pub boat: String,
    /// Resource vendor.
    pub vendor: String,
    /// First day.
    pub start_date: Option<String>,
    /// Last day.
    pub end_date: Option<String>,
    /// Billable days.
    pub working_days: i64,
    /// Daily rate used for the estimate.
    pub rate_estimate: Decimal,
    /// Estimated amount.
    pub amount_estimate: Decimal,
    /// Actual amount.
    pub amount_actual: Option<Decimal>,
}

/// JSON export of the boat assignments.
#[derive(Debug, Serialize)]
pub struct AssignmentExport {
    /// Production name.
    pub production: String,
    /// Exported lines.
    pub rows: Vec<ExportRow>,
    /// Sum of the estimates.
    pub total_estimate: Decimal,
    /// Sum of the actuals.
    pub total_actual: Decimal,
}

/// Builds export lines from assignment listings. Boat assignments outside
/// the boats context and assignments without billable days are skipped.
#[must_use]
pub fn export_rows(details: &[AssignmentDetail], kind: ResourceKind) -> Vec<ExportRow> {
    details
        .iter()
        .filter(|d| d.kind == kind)
        .filter(|d| kind != ResourceKind::Boat || d.function_context == BOATS_CONTEXT)
        .filter(|d| d.working_days > 0)
        .map(|d| ExportRow {
            function: d.function_name.clone(),
            group: d.function_group.clone(),
            boat: d
                .name_override
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| d.resource_name.clone())
                .unwrap_or_default(),
            vendor: d.vendor.clone().unwrap_or_default(),
            start_date: d.start_date.clone(),
            end_date: d.end_date.clone(),
            working_days: d.working_days,
            rate_estimate: effective_estimate_rate(d.price_override, d.daily_rate_estimate),
            amount_estimate: d.amount_estimate,
            amount_actual: d.amount_actual,
        })
        .collect()
}

fn totals(rows: &[ExportRow]) -> (Decimal, Decimal) {
    rows.iter().fold((Decimal::ZERO, Decimal::ZERO), |(est, act), r| {
        (est + r.amount_estimate, act + r.amount_actual.unwrap_or_default())
    })
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn money(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, csv::Error> {
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Renders assignment lines followed by a TOTAL row.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn assignment_csv(rows: &[ExportRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ASSIGNMENT_HEADER)?;
    for r in rows {
        writer.write_record([
            r.function.clone(),
            r.group.clone(),
            r.boat.clone(),
            r.vendor.clone(),
            opt(r.start_date.as_deref()),
            opt(r.end_date.as_deref()),
            r.working_days.to_string(),
            r.rate_estimate.to_string(),
            r.amount_estimate.to_string(),
            money(r.amount_actual),
        ])?;
    }
    let (estimate, actual) = totals(rows);
    let (estimate, actual) = (estimate.to_string(), actual.to_string());
    writer.write_record([
        "TOTAL",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        estimate.as_str(),
        actual.as_str(),
    ])?;
    finish(writer)
}

/// Renders one row per FNB category followed by a TOTAL row.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn fnb_csv(budget: &FnbBudget) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Category", "Purchase", "Consumption", "Balance"])?;
    for c in &budget.categories {
        writer.write_record([
            c.name.clone(),
            c.purchase_total.to_string(),
            c.consumption_total.to_string(),
            (c.purchase_total - c.consumption_total).to_string(),
        ])?;
    }
    writer.write_record([
        "TOTAL".to_string(),
        budget.grand_purchase.to_string(),
        budget.grand_consumption.to_string(),
        budget.balance.to_string(),
    ])?;
    finish(writer)
}

/// Renders every budget row grouped by department, with a subtotal after
/// each department and a GRAND TOTAL row last.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn budget_global_csv(report: &BudgetReport) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(GLOBAL_HEADER)?;
    for (department, totals) in report.by_department.iter() {
        for r in &totals.lines {
            writer.write_record([
                r.department.clone(),
                r.name.clone(),
                r.boat.clone(),
                r.vendor.clone(),
                opt(r.start_date.as_deref()),
                opt(r.end_date.as_deref()),
                r.working_days.map(|d| d.to_string()).unwrap_or_default(),
                r.unit_price_estimate.to_string(),
                r.amount_estimate.to_string(),
                money(r.amount_actual),
                r.source.clone(),
            ])?;
        }
        writer.write_record([
            department.to_string(),
            format!("SUBTOTAL {department}"),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            totals.total_estimate.to_string(),
            totals.total_actual.to_string(),
            String::new(),
        ])?;
    }
    writer.write_record([
        "GRAND TOTAL".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        report.grand_total_estimate.to_string(),
        report.grand_total_actual.to_string(),
        String::new(),
    ])?;
    finish(writer)
}

/// Builds `{PRODUCTION}_{KIND}_{YYMMDD}.csv`.
#[must_use]
pub fn export_filename(production: &str, label: &str) -> String {
    let production: String = production
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    format!(
        "{production}_{}_{}.csv",
        label.to_uppercase(),
        Utc::now().format("%y%m%d")
    )
}

fn kind_label(kind: ResourceKind) -> &'static str {
    kind.export_segment().unwrap_or("boats")
}

fn attachment(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response()
}

async fn production_name(state: &AppState, production_id: i32) -> ApiResult<String> {
    ProductionRepository::new(state.conn())
        .find_by_id(production_id)
        .await?
        .map(|p| p.name)
        .ok_or_else(|| ApiError::not_found("Production not found"))
}

async fn kind_rows(
    state: &AppState,
    production_id: i32,
    kind: ResourceKind,
) -> ApiResult<Vec<ExportRow>> {
    let details = AssignmentRepository::new(state.conn())
        .list(production_id, kind)
        .await?;
    Ok(export_rows(&details, kind))
}

/// GET /export/csv and /export/{kind}/csv
async fn assignments_csv(
    State(state): State<AppState>,
    Extension(kind): Extension<ResourceKind>,
    Path(production_id): Path<i32>,
) -> ApiResult<Response> {
    let name = production_name(&state, production_id).await?;
    let rows = kind_rows(&state, production_id, kind).await?;
    let body = assignment_csv(&rows).map_err(ApiError::internal)?;
    Ok(attachment(&export_filename(&name, kind_label(kind)), body))
}

/// GET /export/json - Boat assignment lines with totals.
async fn boats_json(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Json<AssignmentExport>> {
    let production = production_name(&state, production_id).await?;
    let rows = kind_rows(&state, production_id, ResourceKind::Boat).await?;
    let (total_estimate, total_actual) = totals(&rows);
    Ok(Json(AssignmentExport {
        production,
        rows,
        total_estimate,
        total_actual,
    }))
}

/// GET /export/fnb-budget/csv
async fn fnb_budget_csv(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Response> {
    let name = production_name(&state, production_id).await?;
    let budget = FnbRepository::new(state.conn())
        .budget(production_id)
        .await?;
    let body = fnb_csv(&budget).map_err(ApiError::internal)?;
    Ok(attachment(&export_filename(&name, "fnb"), body))
}

/// GET /export/budget-global
async fn budget_global(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
) -> ApiResult<Response> {
    let name = production_name(&state, production_id).await?;
    let report = BudgetRepository::new(state.conn())
        .report(production_id)
        .await?;
    let body = budget_global_csv(&report).map_err(ApiError::internal)?;
    Ok(attachment(&export_filename(&name, "budget"), body))
}

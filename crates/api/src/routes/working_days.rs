//! Working-day calculator.

use axum::{Json, Router, extract::Query, routing::get};
use serde::{Deserialize, Serialize};

use crate::AppState;
use shootlogix_core::schedule::{DayOverrides, active_working_days, working_days};

/// Creates the working-day routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/working-days", get(count))
}

/// Range to count.
#[derive(Debug, Deserialize)]
pub struct WorkingDaysQuery {
    /// First day, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Last day, `YYYY-MM-DD`.
    pub end: Option<String>,
    /// JSON object of date to day status.
    pub overrides: Option<String>,
}

/// Working-day count.
#[derive(Debug, Serialize)]
pub struct WorkingDaysResponse {
    /// Billable days in the range.
    pub working_days: i64,
}

/// GET /working-days - Unparseable bounds count as zero days.
async fn count(Query(query): Query<WorkingDaysQuery>) -> Json<WorkingDaysResponse> {
    let start = query.start.as_deref();
    let end = query.end.as_deref();
    let working_days = match query.overrides.as_deref() {
        Some(raw) => active_working_days(start, end, &DayOverrides::parse_lenient(Some(raw))),
        None => working_days(start, end),
    };
    Json(WorkingDaysResponse { working_days })
}

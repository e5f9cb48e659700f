//! Assignment repository.
//!
//! Assignments bind a resource to a function over a date range. Listings
//! are enriched with function and resource data and costed on read. Every
//! write is recorded in the history table in the same transaction.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use shootlogix_core::budget::{AssignmentInput, BudgetError, check_amount};
use shootlogix_core::resource::ResourceKind;
use shootlogix_core::schedule::{DayOverrides, OverridesError, is_iso_date};
use thiserror::Error;

use super::history::{HistoryAction, HistoryError, HistoryRepository};
use super::patch::double_option;
use crate::entities::{assignments, functions, resources};

/// Errors that can occur during assignment operations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// No function given.
    #[error("function_id is required")]
    FunctionRequired,

    /// Function does not exist in the production.
    #[error("Function not found")]
    FunctionNotFound(i32),

    /// Resource does not exist in the production or is of another kind.
    #[error("Resource not found")]
    ResourceNotFound(i32),

    /// Assignment not found.
    #[error("Assignment not found")]
    NotFound(i32),

    /// A date field is not `YYYY-MM-DD`.
    #[error("{0} must be YYYY-MM-DD")]
    InvalidDate(&'static str),

    /// End date precedes start date.
    #[error("start_date must be on or before end_date")]
    DateOrder,

    /// Overrides are not an object of strings.
    #[error(transparent)]
    InvalidOverrides(#[from] OverridesError),

    /// Price override outside the accepted range.
    #[error(transparent)]
    InvalidPrice(#[from] BudgetError),

    /// History write failed.
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAssignmentInput {
    /// Function the resource fills.
    pub function_id: Option<i32>,
    /// Assigned resource.
    pub resource_id: Option<i32>,
    /// Free-text name used instead of a resource.
    pub name_override: Option<String>,
    /// First day.
    pub start_date: Option<String>,
    /// Last day.
    pub end_date: Option<String>,
    /// Rate replacing the resource estimate.
    pub price_override: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
    /// Booking status, `confirmed` when omitted.
    pub assignment_status: Option<String>,
    /// Per-day status corrections.
    pub day_overrides: Option<serde_json::Value>,
}

/// Input for updating an assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentInput {
    /// New function.
    pub function_id: Option<i32>,
    /// New resource.
    #[serde(default, deserialize_with = "double_option")]
    pub resource_id: Option<Option<i32>>,
    /// New name override.
    #[serde(default, deserialize_with = "double_option")]
    pub name_override: Option<Option<String>>,
    /// New first day.
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<String>>,
    /// New last day.
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<String>>,
    /// New rate override.
    #[serde(default, deserialize_with = "double_option")]
    pub price_override: Option<Option<Decimal>>,
    /// New notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    /// New booking status.
    pub assignment_status: Option<String>,
    /// New overrides.
    pub day_overrides: Option<serde_json::Value>,
}

/// An assignment with its function, resource and cost.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDetail {
    /// Assignment ID.
    pub id: i32,
    /// Resource kind.
    pub kind: ResourceKind,
    /// Function ID.
    pub function_id: i32,
    /// Resource ID.
    pub resource_id: Option<i32>,
    /// Free-text name.
    pub name_override: Option<String>,
    /// First day.
    pub start_date: Option<String>,
    /// Last day.
    pub end_date: Option<String>,
    /// Rate override.
    pub price_override: Option<Decimal>,
    /// Notes.
    pub notes: Option<String>,
    /// Booking status.
    pub assignment_status: String,
    /// Per-day corrections.
    pub day_overrides: DayOverrides,
    /// Function name.
    pub function_name: String,
    /// Function group.
    pub function_group: String,
    /// Function color.
    pub function_color: String,
    /// Function context.
    pub function_context: String,
    /// Resource name.
    pub resource_name: Option<String>,
    /// Resource vendor.
    pub vendor: Option<String>,
    /// Resource estimate rate.
    pub daily_rate_estimate: Option<Decimal>,
    /// Resource actual rate.
    pub daily_rate_actual: Option<Decimal>,
    /// Billable days after overrides.
    pub working_days: i64,
    /// Estimated cost.
    pub amount_estimate: Decimal,
    /// Actual cost, when an actual rate is known.
    pub amount_actual: Option<Decimal>,
    #[serde(skip)]
    sort_key: (i32, i32),
}

impl AssignmentDetail {
    fn build(
        a: assignments::Model,
        kind: ResourceKind,
        function: &functions::Model,
        resource: Option<&resources::Model>,
    ) -> Self {
        let mut detail = Self {
            id: a.id,
            kind,
            function_id: a.function_id,
            resource_id: a.resource_id,
            name_override: a.name_override,
            start_date: a.start_date,
            end_date: a.end_date,
            price_override: a.price_override,
            notes: a.notes,
            assignment_status: a.assignment_status,
            day_overrides: DayOverrides::parse_lenient(Some(&a.day_overrides)),
            function_name: function.name.clone(),
            function_group: function.function_group.clone(),
            function_color: function.color.clone(),
            function_context: function.context.clone(),
            resource_name: resource.map(|r| r.name.clone()),
            vendor: resource.and_then(|r| r.vendor.clone()),
            daily_rate_estimate: resource.map(|r| r.daily_rate_estimate),
            daily_rate_actual: resource.and_then(|r| r.daily_rate_actual),
            working_days: 0,
            amount_estimate: Decimal::ZERO,
            amount_actual: None,
            sort_key: (function.sort_order, function.id),
        };
        let cost = detail.to_input().cost();
        detail.working_days = cost.working_days;
        detail.amount_estimate = cost.amount_estimate;
        detail.amount_actual = cost.amount_actual;
        detail
    }

    /// Converts to the budget rollup input.
    #[must_use]
    pub fn to_input(&self) -> AssignmentInput {
        AssignmentInput {
            id: self.id,
            kind: self.kind,
            function_name: self.function_name.clone(),
            function_group: Some(self.function_group.clone()),
            function_context: self.function_context.clone(),
            resource_name: self.resource_name.clone(),
            name_override: self.name_override.clone(),
            vendor: self.vendor.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            price_override: self.price_override,
            daily_rate_estimate: self.daily_rate_estimate,
            daily_rate_actual: self.daily_rate_actual,
            day_overrides: self.day_overrides.clone(),
        }
    }
}

/// Assignment repository.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's assignments of one kind, ordered by function.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        production_id: i32,
        kind: ResourceKind,
    ) -> Result<Vec<AssignmentDetail>, DbErr> {
        self.enriched(production_id, Some(kind)).await
    }

    /// Lists every assignment of a production as rollup inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn budget_inputs(&self, production_id: i32) -> Result<Vec<AssignmentInput>, DbErr> {
        Ok(self
            .enriched(production_id, None)
            .await?
            .iter()
            .map(AssignmentDetail::to_input)
            .collect())
    }

    /// Finds one enriched assignment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn detail(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
    ) -> Result<AssignmentDetail, AssignmentError> {
        self.enriched(production_id, Some(kind))
            .await?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or(AssignmentError::NotFound(id))
    }

    /// Creates an assignment and records it in history.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or a database error.
    pub async fn create(
        &self,
        production_id: i32,
        kind: ResourceKind,
        input: CreateAssignmentInput,
        user_id: Option<i32>,
    ) -> Result<AssignmentDetail, AssignmentError> {
        let function_id = input.function_id.ok_or(AssignmentError::FunctionRequired)?;
        self.check_function(production_id, function_id).await?;
        if let Some(resource_id) = input.resource_id {
            self.check_resource(production_id, kind, resource_id).await?;
        }
        let start_date = normalize_date(input.start_date, "start_date")?;
        let end_date = normalize_date(input.end_date, "end_date")?;
        check_order(start_date.as_deref(), end_date.as_deref())?;
        check_amount("price_override", input.price_override)?;
        let overrides = match &input.day_overrides {
            Some(value) => DayOverrides::parse_strict(value)?,
            None => DayOverrides::new(),
        };

        let now = chrono::Utc::now();
        let txn = self.db.begin().await?;
        let created = assignments::ActiveModel {
            production_id: Set(production_id),
            kind: Set(kind.as_str().to_string()),
            function_id: Set(function_id),
            resource_id: Set(input.resource_id),
            name_override: Set(input.name_override),
            start_date: Set(start_date),
            end_date: Set(end_date),
            price_override: Set(input.price_override),
            notes: Set(input.notes),
            assignment_status: Set(input
                .assignment_status
                .unwrap_or_else(|| "confirmed".to_string())),
            day_overrides: Set(overrides.to_json()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        HistoryRepository::record(
            &txn,
            production_id,
            HistoryAction::Create,
            None,
            Some(&created),
            user_id,
        )
        .await?;
        txn.commit().await?;

        tracing::debug!(production_id, assignment_id = created.id, kind = %kind, "Assignment created");
        self.detail(production_id, kind, created.id).await
    }

    /// Updates an assignment and records the change in history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a validation error, or a database error.
    pub async fn update(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
        input: UpdateAssignmentInput,
        user_id: Option<i32>,
    ) -> Result<AssignmentDetail, AssignmentError> {
        let old = self.find(production_id, kind, id).await?;
        let mut active: assignments::ActiveModel = old.clone().into();

        if let Some(function_id) = input.function_id {
            self.check_function(production_id, function_id).await?;
            active.function_id = Set(function_id);
        }
        if let Some(resource_id) = input.resource_id {
            if let Some(resource_id) = resource_id {
                self.check_resource(production_id, kind, resource_id).await?;
            }
            active.resource_id = Set(resource_id);
        }

        let start_date = match input.start_date {
            Some(v) => normalize_date(v, "start_date")?,
            None => old.start_date.clone(),
        };
        let end_date = match input.end_date {
            Some(v) => normalize_date(v, "end_date")?,
            None => old.end_date.clone(),
        };
        check_order(start_date.as_deref(), end_date.as_deref())?;
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);

        if let Some(v) = input.name_override {
            active.name_override = Set(v);
        }
        if let Some(v) = input.price_override {
            check_amount("price_override", v)?;
            active.price_override = Set(v);
        }
        if let Some(v) = input.notes {
            active.notes = Set(v);
        }
        if let Some(v) = input.assignment_status {
            active.assignment_status = Set(v);
        }
        if let Some(value) = &input.day_overrides {
            active.day_overrides = Set(DayOverrides::parse_strict(value)?.to_json());
        }
        active.updated_at = Set(chrono::Utc::now());

        let txn = self.db.begin().await?;
        let updated = active.update(&txn).await?;
        HistoryRepository::record(
            &txn,
            production_id,
            HistoryAction::Update,
            Some(&old),
            Some(&updated),
            user_id,
        )
        .await?;
        txn.commit().await?;

        self.detail(production_id, kind, id).await
    }

    /// Deletes an assignment and records it in history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
        user_id: Option<i32>,
    ) -> Result<(), AssignmentError> {
        let old = self.find(production_id, kind, id).await?;

        let txn = self.db.begin().await?;
        assignments::Entity::delete_by_id(id).exec(&txn).await?;
        HistoryRepository::record(
            &txn,
            production_id,
            HistoryAction::Delete,
            Some(&old),
            None,
            user_id,
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Deletes every assignment of one kind on a function. Returns how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a database write fails.
    pub async fn clear_function(
        &self,
        production_id: i32,
        kind: ResourceKind,
        function_id: i32,
        user_id: Option<i32>,
    ) -> Result<u64, AssignmentError> {
        let txn = self.db.begin().await?;
        let rows = assignments::Entity::find()
            .filter(assignments::Column::ProductionId.eq(production_id))
            .filter(assignments::Column::Kind.eq(kind.as_str()))
            .filter(assignments::Column::FunctionId.eq(function_id))
            .all(&txn)
            .await?;

        for row in &rows {
            assignments::Entity::delete_by_id(row.id).exec(&txn).await?;
            HistoryRepository::record(
                &txn,
                production_id,
                HistoryAction::Delete,
                Some(row),
                None,
                user_id,
            )
            .await?;
        }
        txn.commit().await?;

        Ok(rows.len() as u64)
    }

    async fn find(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
    ) -> Result<assignments::Model, AssignmentError> {
        assignments::Entity::find_by_id(id)
            .filter(assignments::Column::ProductionId.eq(production_id))
            .filter(assignments::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await?
            .ok_or(AssignmentError::NotFound(id))
    }

    async fn check_function(&self, production_id: i32, id: i32) -> Result<(), AssignmentError> {
        functions::Entity::find_by_id(id)
            .filter(functions::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(AssignmentError::FunctionNotFound(id))
    }

    async fn check_resource(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
    ) -> Result<(), AssignmentError> {
        resources::Entity::find_by_id(id)
            .filter(resources::Column::ProductionId.eq(production_id))
            .filter(resources::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(AssignmentError::ResourceNotFound(id))
    }

    async fn enriched(
        &self,
        production_id: i32,
        kind: Option<ResourceKind>,
    ) -> Result<Vec<AssignmentDetail>, DbErr> {
        let mut query = assignments::Entity::find()
            .filter(assignments::Column::ProductionId.eq(production_id));
        if let Some(kind) = kind {
            query = query.filter(assignments::Column::Kind.eq(kind.as_str()));
        }
        let rows = query.all(&self.db).await?;

        let functions: HashMap<i32, functions::Model> = functions::Entity::find()
            .filter(functions::Column::ProductionId.eq(production_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();
        let resources: HashMap<i32, resources::Model> = resources::Entity::find()
            .filter(resources::Column::ProductionId.eq(production_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let mut details: Vec<AssignmentDetail> = rows
            .into_iter()
            .filter_map(|a| {
                let Ok(kind) = a.kind.parse::<ResourceKind>() else {
                    tracing::warn!(assignment_id = a.id, kind = %a.kind, "Skipping assignment of unknown kind");
                    return None;
                };
                let function = functions.get(&a.function_id)?;
                let resource = a.resource_id.and_then(|id| resources.get(&id));
                Some(AssignmentDetail::build(a, kind, function, resource))
            })
            .collect();

        details.sort_by(|a, b| {
            a.sort_key
                .cmp(&b.sort_key)
                .then_with(|| a.start_date.cmp(&b.start_date))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(details)
    }
}

/// Treats blank dates as absent and rejects anything but `YYYY-MM-DD`.
fn normalize_date(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, AssignmentError> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) if is_iso_date(&s) => Ok(Some(s)),
        Some(_) => Err(AssignmentError::InvalidDate(field)),
    }
}

fn check_order(start: Option<&str>, end: Option<&str>) -> Result<(), AssignmentError> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(AssignmentError::DateOrder),
        _ => Ok(()),
    }
}

//! Budget repository: manual lines and the production budget view.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use shootlogix_core::budget::{
    BudgetError, BudgetInputs, BudgetReport, BudgetService, ManualLineDraft, ManualLineInput,
};
use thiserror::Error;

use super::{AssignmentRepository, FnbRepository, GuardRepository, LocationRepository};
use crate::entities::{budget_lines, departments};

/// Source tag of lines generated from other tables.
pub const AUTO_SOURCE: &str = "auto";

/// Source tag of lines entered by hand.
pub const MANUAL_SOURCE: &str = "manual";

/// Errors that can occur during budget line operations.
#[derive(Debug, Error)]
pub enum BudgetLineError {
    /// Line failed validation.
    #[error(transparent)]
    Invalid(#[from] BudgetError),

    /// Department not found in the production.
    #[error("Department not found")]
    DepartmentNotFound(i32),

    /// Line not found.
    #[error("Budget line not found")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a manual budget line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBudgetLineInput {
    /// Department the line belongs to.
    pub department_id: Option<i32>,
    /// Line name.
    #[serde(default)]
    pub name: String,
    /// Unit of measure, `day` when omitted.
    pub unit: Option<String>,
    /// Estimated quantity.
    pub qty_estimate: Option<Decimal>,
    /// Estimated unit price.
    pub unit_price_estimate: Option<Decimal>,
    /// Actual quantity.
    pub qty_actual: Option<Decimal>,
    /// Actual unit price.
    pub unit_price_actual: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's stored budget lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_lines(&self, production_id: i32) -> Result<Vec<budget_lines::Model>, DbErr> {
        budget_lines::Entity::find()
            .filter(budget_lines::Column::ProductionId.eq(production_id))
            .order_by_asc(budget_lines::Column::Id)
            .all(&self.db)
            .await
    }

    /// Creates a manual line with computed amounts.
    ///
    /// # Errors
    ///
    /// Returns `Invalid`, `DepartmentNotFound` or a database error.
    pub async fn create_line(
        &self,
        production_id: i32,
        input: CreateBudgetLineInput,
    ) -> Result<budget_lines::Model, BudgetLineError> {
        let draft = ManualLineDraft {
            name: input.name.trim().to_string(),
            qty_estimate: input.qty_estimate.unwrap_or_default(),
            unit_price_estimate: input.unit_price_estimate.unwrap_or_default(),
            qty_actual: input.qty_actual,
            unit_price_actual: input.unit_price_actual,
        };
        let amounts = BudgetService::price_manual_line(&draft)?;

        if let Some(department_id) = input.department_id {
            departments::Entity::find_by_id(department_id)
                .filter(departments::Column::ProductionId.eq(production_id))
                .one(&self.db)
                .await?
                .ok_or(BudgetLineError::DepartmentNotFound(department_id))?;
        }

        Ok(budget_lines::ActiveModel {
            production_id: Set(production_id),
            department_id: Set(input.department_id),
            name: Set(draft.name),
            unit: Set(input.unit.unwrap_or_else(|| "day".to_string())),
            qty_estimate: Set(draft.qty_estimate),
            unit_price_estimate: Set(draft.unit_price_estimate),
            amount_estimate: Set(amounts.amount_estimate),
            qty_actual: Set(draft.qty_actual),
            unit_price_actual: Set(draft.unit_price_actual),
            amount_actual: Set(amounts.amount_actual),
            source: Set(MANUAL_SOURCE.to_string()),
            notes: Set(input.notes),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Deletes a budget line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete_line(&self, production_id: i32, id: i32) -> Result<(), BudgetLineError> {
        let result = budget_lines::Entity::delete_many()
            .filter(budget_lines::Column::Id.eq(id))
            .filter(budget_lines::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(BudgetLineError::NotFound(id));
        }
        Ok(())
    }

    /// Loads everything the budget rollup reads for a production.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn load_inputs(&self, production_id: i32) -> Result<BudgetInputs, DbErr> {
        let assignments = AssignmentRepository::new(self.db.clone())
            .budget_inputs(production_id)
            .await?;
        let (fnb_categories, fnb_items, fnb_entries) = FnbRepository::new(self.db.clone())
            .budget_inputs(production_id)
            .await?;
        let (location_sites, location_days) = LocationRepository::new(self.db.clone())
            .budget_inputs(production_id)
            .await?;
        let guard_days = GuardRepository::new(self.db.clone())
            .budget_inputs(production_id)
            .await?;

        Ok(BudgetInputs {
            assignments,
            fnb_categories,
            fnb_items,
            fnb_entries,
            location_sites,
            location_days,
            guard_days,
            manual_lines: self.manual_lines(production_id).await?,
        })
    }

    /// Builds the budget view of a production.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn report(&self, production_id: i32) -> Result<BudgetReport, DbErr> {
        let inputs = self.load_inputs(production_id).await?;
        Ok(BudgetService::build_report(&inputs))
    }

    /// Lines not generated automatically, ordered by department ID then ID.
    /// Lines without a department come first.
    async fn manual_lines(&self, production_id: i32) -> Result<Vec<ManualLineInput>, DbErr> {
        let names: HashMap<i32, String> = departments::Entity::find()
            .filter(departments::Column::ProductionId.eq(production_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        let lines = budget_lines::Entity::find()
            .filter(budget_lines::Column::ProductionId.eq(production_id))
            .filter(budget_lines::Column::Source.ne(AUTO_SOURCE))
            .order_by_asc(budget_lines::Column::DepartmentId)
            .order_by_asc(budget_lines::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| ManualLineInput {
                id: l.id,
                department_name: l.department_id.and_then(|id| names.get(&id).cloned()),
                name: l.name,
                unit_price_estimate: Some(l.unit_price_estimate),
                amount_estimate: Some(l.amount_estimate),
                amount_actual: l.amount_actual,
                source: l.source,
            })
            .collect();
        Ok(lines)
    }
}

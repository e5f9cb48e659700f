//! Guard posts and guard location schedules.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use shootlogix_core::budget::{BudgetError, GUARD_DAILY_RATE, GuardDayInput, check_amount};
use thiserror::Error;

use super::location::{ScheduleError, validate_day};
use super::patch::double_option;
use crate::entities::{guard_location_schedules, guard_posts};

/// Errors that can occur during guard post operations.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Name is blank.
    #[error("Guard post name is required")]
    NameRequired,

    /// Post not found.
    #[error("Guard post not found")]
    NotFound(i32),

    /// Daily rate outside the accepted range.
    #[error(transparent)]
    InvalidRate(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a guard post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGuardPostInput {
    /// Post name.
    #[serde(default)]
    pub name: String,
    /// Daily rate per guard, 45 when omitted.
    pub daily_rate: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
}

/// Input for updating a guard post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGuardPostInput {
    /// New name.
    pub name: Option<String>,
    /// New rate.
    pub daily_rate: Option<Decimal>,
    /// New notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Input for setting one guard schedule cell.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertGuardScheduleInput {
    /// Location name.
    #[serde(default)]
    pub location_name: String,
    /// Day.
    #[serde(default)]
    pub date: String,
    /// `P`, `F` or `W`.
    #[serde(default)]
    pub status: String,
    /// Guards on duty, 1 when omitted.
    pub nb_guards: Option<i32>,
}

/// Guard repository.
#[derive(Debug, Clone)]
pub struct GuardRepository {
    db: DatabaseConnection,
}

impl GuardRepository {
    /// Creates a new guard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's guard posts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_posts(&self, production_id: i32) -> Result<Vec<guard_posts::Model>, DbErr> {
        guard_posts::Entity::find()
            .filter(guard_posts::Column::ProductionId.eq(production_id))
            .order_by_asc(guard_posts::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a guard post.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired` or a database error.
    pub async fn create_post(
        &self,
        production_id: i32,
        input: CreateGuardPostInput,
    ) -> Result<guard_posts::Model, GuardError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(GuardError::NameRequired);
        }
        check_amount("daily_rate", input.daily_rate)?;

        Ok(guard_posts::ActiveModel {
            production_id: Set(production_id),
            name: Set(name.to_string()),
            daily_rate: Set(input
                .daily_rate
                .unwrap_or_else(|| Decimal::from(GUARD_DAILY_RATE))),
            notes: Set(input.notes),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates a guard post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NameRequired` or a database error.
    pub async fn update_post(
        &self,
        production_id: i32,
        id: i32,
        input: UpdateGuardPostInput,
    ) -> Result<guard_posts::Model, GuardError> {
        let post = guard_posts::Entity::find_by_id(id)
            .filter(guard_posts::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(GuardError::NotFound(id))?;
        let mut active: guard_posts::ActiveModel = post.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(GuardError::NameRequired);
            }
            active.name = Set(name);
        }
        if let Some(rate) = input.daily_rate {
            check_amount("daily_rate", Some(rate))?;
            active.daily_rate = Set(rate);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a guard post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete_post(&self, production_id: i32, id: i32) -> Result<(), GuardError> {
        let result = guard_posts::Entity::delete_many()
            .filter(guard_posts::Column::Id.eq(id))
            .filter(guard_posts::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(GuardError::NotFound(id));
        }
        Ok(())
    }

    /// Lists a production's guard schedule cells by date then location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_schedules(
        &self,
        production_id: i32,
    ) -> Result<Vec<guard_location_schedules::Model>, DbErr> {
        guard_location_schedules::Entity::find()
            .filter(guard_location_schedules::Column::ProductionId.eq(production_id))
            .order_by_asc(guard_location_schedules::Column::Date)
            .order_by_asc(guard_location_schedules::Column::LocationName)
            .all(&self.db)
            .await
    }

    /// Sets guards for one location on one day.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `Locked` when the existing cell is
    /// locked, or a database error.
    pub async fn upsert_schedule(
        &self,
        production_id: i32,
        input: UpsertGuardScheduleInput,
    ) -> Result<guard_location_schedules::Model, ScheduleError> {
        let location_name = input.location_name.trim().to_string();
        if location_name.is_empty() {
            return Err(ScheduleError::Required("location_name"));
        }
        validate_day(&input.date, &input.status)?;
        let nb_guards = input.nb_guards.unwrap_or(1);
        if nb_guards < 0 {
            return Err(ScheduleError::NegativeGuards);
        }

        let existing = guard_location_schedules::Entity::find()
            .filter(guard_location_schedules::Column::ProductionId.eq(production_id))
            .filter(guard_location_schedules::Column::LocationName.eq(&location_name))
            .filter(guard_location_schedules::Column::Date.eq(&input.date))
            .one(&self.db)
            .await?;

        match existing {
            Some(row) if row.locked => Err(ScheduleError::Locked),
            Some(row) => {
                let mut active: guard_location_schedules::ActiveModel = row.into();
                active.status = Set(input.status);
                active.nb_guards = Set(nb_guards);
                Ok(active.update(&self.db).await?)
            }
            None => Ok(guard_location_schedules::ActiveModel {
                production_id: Set(production_id),
                location_name: Set(location_name),
                date: Set(input.date),
                status: Set(input.status),
                nb_guards: Set(nb_guards),
                locked: Set(false),
                ..Default::default()
            }
            .insert(&self.db)
            .await?),
        }
    }

    /// Deletes one guard schedule cell.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Locked` or a database error.
    pub async fn delete_schedule(&self, production_id: i32, id: i32) -> Result<(), ScheduleError> {
        let row = guard_location_schedules::Entity::find_by_id(id)
            .filter(guard_location_schedules::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(ScheduleError::NotFound("Guard schedule entry"))?;
        if row.locked {
            return Err(ScheduleError::Locked);
        }
        guard_location_schedules::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Loads guard cells for the budget rollup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn budget_inputs(&self, production_id: i32) -> Result<Vec<GuardDayInput>, DbErr> {
        Ok(self
            .list_schedules(production_id)
            .await?
            .into_iter()
            .map(|d| GuardDayInput {
                location_name: d.location_name,
                nb_guards: i64::from(d.nb_guards),
            })
            .collect())
    }
}

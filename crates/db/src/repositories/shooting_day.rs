//! Shooting day repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use shootlogix_core::schedule::is_iso_date;
use thiserror::Error;

use super::patch::double_option;
use crate::entities::shooting_days;

/// Errors that can occur during shooting day operations.
#[derive(Debug, Error)]
pub enum ShootingDayError {
    /// Date is missing or not `YYYY-MM-DD`.
    #[error("date must be YYYY-MM-DD")]
    InvalidDate,

    /// Shooting day not found.
    #[error("Shooting day not found")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a shooting day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateShootingDayInput {
    /// Calendar date.
    #[serde(default)]
    pub date: String,
    /// Sequence number in the schedule.
    pub day_number: Option<i32>,
    /// Main location.
    pub location: Option<String>,
    /// Game or segment shot that day.
    pub game_name: Option<String>,
    /// Free text.
    pub notes: Option<String>,
    /// Day status, `draft` when omitted.
    pub status: Option<String>,
}

/// Input for updating a shooting day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShootingDayInput {
    /// New date.
    pub date: Option<String>,
    /// New sequence number.
    #[serde(default, deserialize_with = "double_option")]
    pub day_number: Option<Option<i32>>,
    /// New location.
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    /// New game name.
    #[serde(default, deserialize_with = "double_option")]
    pub game_name: Option<Option<String>>,
    /// New notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    /// New status.
    pub status: Option<String>,
}

/// Shooting day repository.
#[derive(Debug, Clone)]
pub struct ShootingDayRepository {
    db: DatabaseConnection,
}

impl ShootingDayRepository {
    /// Creates a new shooting day repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's shooting days by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, production_id: i32) -> Result<Vec<shooting_days::Model>, DbErr> {
        shooting_days::Entity::find()
            .filter(shooting_days::Column::ProductionId.eq(production_id))
            .order_by_asc(shooting_days::Column::Date)
            .order_by_asc(shooting_days::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a shooting day within a production.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn get(
        &self,
        production_id: i32,
        id: i32,
    ) -> Result<shooting_days::Model, ShootingDayError> {
        shooting_days::Entity::find_by_id(id)
            .filter(shooting_days::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(ShootingDayError::NotFound(id))
    }

    /// Creates a shooting day.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` or a database error.
    pub async fn create(
        &self,
        production_id: i32,
        input: CreateShootingDayInput,
    ) -> Result<shooting_days::Model, ShootingDayError> {
        if !is_iso_date(&input.date) {
            return Err(ShootingDayError::InvalidDate);
        }

        Ok(shooting_days::ActiveModel {
            production_id: Set(production_id),
            date: Set(input.date),
            day_number: Set(input.day_number),
            location: Set(input.location),
            game_name: Set(input.game_name),
            notes: Set(input.notes),
            status: Set(input.status.unwrap_or_else(|| "draft".to_string())),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates a shooting day.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidDate` or a database error.
    pub async fn update(
        &self,
        production_id: i32,
        id: i32,
        input: UpdateShootingDayInput,
    ) -> Result<shooting_days::Model, ShootingDayError> {
        let day = self.get(production_id, id).await?;
        let mut active: shooting_days::ActiveModel = day.into();

        if let Some(date) = input.date {
            if !is_iso_date(&date) {
                return Err(ShootingDayError::InvalidDate);
            }
            active.date = Set(date);
        }
        if let Some(day_number) = input.day_number {
            active.day_number = Set(day_number);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(game_name) = input.game_name {
            active.game_name = Set(game_name);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a shooting day.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, production_id: i32, id: i32) -> Result<(), ShootingDayError> {
        let result = shooting_days::Entity::delete_many()
            .filter(shooting_days::Column::Id.eq(id))
            .filter(shooting_days::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ShootingDayError::NotFound(id));
        }
        Ok(())
    }
}

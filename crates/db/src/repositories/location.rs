//! Location sites and their P/F/W day schedules.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};
use serde::Deserialize;
use shootlogix_core::budget::{BudgetError, LocationDayInput, LocationSiteInput, check_amount};
use shootlogix_core::schedule::is_iso_date;
use thiserror::Error;

use super::patch::double_option;
use crate::entities::{location_schedules, locations};

/// Day statuses accepted in location and guard schedules.
pub const DAY_STATUSES: [&str; 3] = ["P", "F", "W"];

/// Errors shared by the location and guard schedule repositories.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Name is blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Status is not P, F or W.
    #[error("status must be P, F or W")]
    InvalidStatus(String),

    /// Date is not `YYYY-MM-DD`.
    #[error("date must be YYYY-MM-DD")]
    InvalidDate,

    /// Guard count is negative.
    #[error("nb_guards must be zero or more")]
    NegativeGuards,

    /// Row is locked against edits.
    #[error("This day is locked")]
    Locked,

    /// Row not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Price outside the accepted range.
    #[error(transparent)]
    InvalidPrice(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a location site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLocationInput {
    /// Site name.
    #[serde(default)]
    pub name: String,
    /// Site type, `game` when omitted.
    pub location_type: Option<String>,
    /// How to get there.
    pub access_note: Option<String>,
    /// Price per prep day.
    pub price_p: Option<Decimal>,
    /// Price per filming day.
    pub price_f: Option<Decimal>,
    /// Price per wrap day.
    pub price_w: Option<Decimal>,
    /// Flat price for the whole shoot.
    pub global_deal: Option<Decimal>,
}

/// Input for updating a location site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLocationInput {
    /// New name.
    pub name: Option<String>,
    /// New type.
    pub location_type: Option<String>,
    /// New access note.
    #[serde(default, deserialize_with = "double_option")]
    pub access_note: Option<Option<String>>,
    /// New prep price.
    #[serde(default, deserialize_with = "double_option")]
    pub price_p: Option<Option<Decimal>>,
    /// New filming price.
    #[serde(default, deserialize_with = "double_option")]
    pub price_f: Option<Option<Decimal>>,
    /// New wrap price.
    #[serde(default, deserialize_with = "double_option")]
    pub price_w: Option<Option<Decimal>>,
    /// New flat price.
    #[serde(default, deserialize_with = "double_option")]
    pub global_deal: Option<Option<Decimal>>,
}

/// Input for setting one location schedule cell.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertLocationScheduleInput {
    /// Location name.
    #[serde(default)]
    pub location_name: String,
    /// Location type, `game` when omitted.
    pub location_type: Option<String>,
    /// Day.
    #[serde(default)]
    pub date: String,
    /// `P`, `F` or `W`.
    #[serde(default)]
    pub status: String,
    /// Free text.
    pub notes: Option<String>,
}

/// Location repository.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    db: DatabaseConnection,
}

impl LocationRepository {
    /// Creates a new location repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's sites by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sites(&self, production_id: i32) -> Result<Vec<locations::Model>, DbErr> {
        locations::Entity::find()
            .filter(locations::Column::ProductionId.eq(production_id))
            .order_by_asc(locations::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a site.
    ///
    /// # Errors
    ///
    /// Returns `Required` or a database error.
    pub async fn create_site(
        &self,
        production_id: i32,
        input: CreateLocationInput,
    ) -> Result<locations::Model, ScheduleError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ScheduleError::Required("name"));
        }
        check_amount("price_p", input.price_p)?;
        check_amount("price_f", input.price_f)?;
        check_amount("price_w", input.price_w)?;
        check_amount("global_deal", input.global_deal)?;

        Ok(locations::ActiveModel {
            production_id: Set(production_id),
            name: Set(name.to_string()),
            location_type: Set(input.location_type.unwrap_or_else(|| "game".to_string())),
            access_note: Set(input.access_note),
            price_p: Set(input.price_p),
            price_f: Set(input.price_f),
            price_w: Set(input.price_w),
            global_deal: Set(input.global_deal),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates a site.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Required` or a database error.
    pub async fn update_site(
        &self,
        production_id: i32,
        id: i32,
        input: UpdateLocationInput,
    ) -> Result<locations::Model, ScheduleError> {
        let site = locations::Entity::find_by_id(id)
            .filter(locations::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(ScheduleError::NotFound("Location"))?;
        let mut active: locations::ActiveModel = site.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ScheduleError::Required("name"));
            }
            active.name = Set(name);
        }
        if let Some(v) = input.location_type {
            active.location_type = Set(v);
        }
        if let Some(v) = input.access_note {
            active.access_note = Set(v);
        }
        if let Some(v) = input.price_p {
            check_amount("price_p", v)?;
            active.price_p = Set(v);
        }
        if let Some(v) = input.price_f {
            check_amount("price_f", v)?;
            active.price_f = Set(v);
        }
        if let Some(v) = input.price_w {
            check_amount("price_w", v)?;
            active.price_w = Set(v);
        }
        if let Some(v) = input.global_deal {
            check_amount("global_deal", v)?;
            active.global_deal = Set(v);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a site.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete_site(&self, production_id: i32, id: i32) -> Result<(), ScheduleError> {
        let result = locations::Entity::delete_many()
            .filter(locations::Column::Id.eq(id))
            .filter(locations::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ScheduleError::NotFound("Location"));
        }
        Ok(())
    }

    /// Lists a production's schedule cells by date then location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_schedules(
        &self,
        production_id: i32,
    ) -> Result<Vec<location_schedules::Model>, DbErr> {
        location_schedules::Entity::find()
            .filter(location_schedules::Column::ProductionId.eq(production_id))
            .order_by_asc(location_schedules::Column::Date)
            .order_by_asc(location_schedules::Column::LocationName)
            .all(&self.db)
            .await
    }

    /// Sets the status of one location on one day.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `Locked` when the existing cell is
    /// locked, or a database error.
    pub async fn upsert_schedule(
        &self,
        production_id: i32,
        input: UpsertLocationScheduleInput,
    ) -> Result<location_schedules::Model, ScheduleError> {
        let location_name = input.location_name.trim().to_string();
        if location_name.is_empty() {
            return Err(ScheduleError::Required("location_name"));
        }
        validate_day(&input.date, &input.status)?;

        let existing = location_schedules::Entity::find()
            .filter(location_schedules::Column::ProductionId.eq(production_id))
            .filter(location_schedules::Column::LocationName.eq(&location_name))
            .filter(location_schedules::Column::Date.eq(&input.date))
            .one(&self.db)
            .await?;

        match existing {
            Some(row) if row.locked => Err(ScheduleError::Locked),
            Some(row) => {
                let mut active: location_schedules::ActiveModel = row.into();
                active.status = Set(input.status);
                if let Some(location_type) = input.location_type {
                    active.location_type = Set(location_type);
                }
                if input.notes.is_some() {
                    active.notes = Set(input.notes);
                }
                Ok(active.update(&self.db).await?)
            }
            None => Ok(location_schedules::ActiveModel {
                production_id: Set(production_id),
                location_name: Set(location_name),
                location_type: Set(input.location_type.unwrap_or_else(|| "game".to_string())),
                date: Set(input.date),
                status: Set(input.status),
                locked: Set(false),
                notes: Set(input.notes),
                ..Default::default()
            }
            .insert(&self.db)
            .await?),
        }
    }

    /// Deletes one schedule cell.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Locked` or a database error.
    pub async fn delete_schedule(&self, production_id: i32, id: i32) -> Result<(), ScheduleError> {
        let row = location_schedules::Entity::find_by_id(id)
            .filter(location_schedules::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(ScheduleError::NotFound("Schedule entry"))?;
        if row.locked {
            return Err(ScheduleError::Locked);
        }
        location_schedules::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Locks or unlocks every cell on the given days. Returns the number of
    /// cells changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_locked(
        &self,
        production_id: i32,
        dates: &[String],
        locked: bool,
    ) -> Result<u64, DbErr> {
        if dates.is_empty() {
            return Ok(0);
        }
        let result = location_schedules::Entity::update_many()
            .col_expr(location_schedules::Column::Locked, Expr::value(locked))
            .filter(location_schedules::Column::ProductionId.eq(production_id))
            .filter(location_schedules::Column::Date.is_in(dates.iter().cloned()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Loads sites and schedule cells for the budget rollup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn budget_inputs(
        &self,
        production_id: i32,
    ) -> Result<(Vec<LocationSiteInput>, Vec<LocationDayInput>), DbErr> {
        let sites = self
            .list_sites(production_id)
            .await?
            .into_iter()
            .map(|s| LocationSiteInput {
                name: s.name,
                price_p: s.price_p,
                price_f: s.price_f,
                price_w: s.price_w,
                global_deal: s.global_deal,
            })
            .collect();
        let days = self
            .list_schedules(production_id)
            .await?
            .into_iter()
            .map(|d| LocationDayInput {
                location_name: d.location_name,
                status: d.status,
            })
            .collect();
        Ok((sites, days))
    }
}

/// Checks the date and P/F/W status of a schedule cell.
pub(crate) fn validate_day(date: &str, status: &str) -> Result<(), ScheduleError> {
    if !is_iso_date(date) {
        return Err(ScheduleError::InvalidDate);
    }
    if !DAY_STATUSES.contains(&status) {
        return Err(ScheduleError::InvalidStatus(status.to_string()));
    }
    Ok(())
}

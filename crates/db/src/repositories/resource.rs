//! Resource repository for every assignable kind.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use shootlogix_core::budget::{BudgetError, check_amount};
use shootlogix_core::resource::ResourceKind;
use thiserror::Error;

use super::patch::double_option;
use crate::entities::resources;

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Name is blank.
    #[error("{0} name is required")]
    NameRequired(&'static str),

    /// Resource not found for this kind and production.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Daily rate outside the accepted range.
    #[error(transparent)]
    InvalidRate(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateResourceInput {
    /// Resource name.
    #[serde(default)]
    pub name: String,
    /// Category (boat type, vehicle type, ...).
    pub category: Option<String>,
    /// Seats or load.
    pub capacity: Option<String>,
    /// Supplier.
    pub vendor: Option<String>,
    /// Supplier contact.
    pub contact: Option<String>,
    /// Display group.
    pub group_name: Option<String>,
    /// Free text.
    pub notes: Option<String>,
    /// Estimated daily rate, 0 when omitted.
    pub daily_rate_estimate: Option<Decimal>,
    /// Negotiated daily rate.
    pub daily_rate_actual: Option<Decimal>,
}

/// Input for updating a resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResourceInput {
    /// New name.
    pub name: Option<String>,
    /// New category.
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    /// New capacity.
    #[serde(default, deserialize_with = "double_option")]
    pub capacity: Option<Option<String>>,
    /// New vendor.
    #[serde(default, deserialize_with = "double_option")]
    pub vendor: Option<Option<String>>,
    /// New contact.
    #[serde(default, deserialize_with = "double_option")]
    pub contact: Option<Option<String>>,
    /// New group.
    #[serde(default, deserialize_with = "double_option")]
    pub group_name: Option<Option<String>>,
    /// New notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    /// New estimated rate.
    pub daily_rate_estimate: Option<Decimal>,
    /// New actual rate.
    #[serde(default, deserialize_with = "double_option")]
    pub daily_rate_actual: Option<Option<Decimal>>,
}

/// Resource repository.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    db: DatabaseConnection,
}

impl ResourceRepository {
    /// Creates a new resource repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's resources of one kind, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        production_id: i32,
        kind: ResourceKind,
    ) -> Result<Vec<resources::Model>, DbErr> {
        resources::Entity::find()
            .filter(resources::Column::ProductionId.eq(production_id))
            .filter(resources::Column::Kind.eq(kind.as_str()))
            .order_by_asc(resources::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a resource of one kind within a production.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn get(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
    ) -> Result<resources::Model, ResourceError> {
        resources::Entity::find_by_id(id)
            .filter(resources::Column::ProductionId.eq(production_id))
            .filter(resources::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await?
            .ok_or(ResourceError::NotFound(kind.label()))
    }

    /// Creates a resource.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired`, `InvalidRate` or a database error.
    pub async fn create(
        &self,
        production_id: i32,
        kind: ResourceKind,
        input: CreateResourceInput,
    ) -> Result<resources::Model, ResourceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ResourceError::NameRequired(kind.label()));
        }
        check_amount("daily_rate_estimate", input.daily_rate_estimate)?;
        check_amount("daily_rate_actual", input.daily_rate_actual)?;

        Ok(resources::ActiveModel {
            production_id: Set(production_id),
            kind: Set(kind.as_str().to_string()),
            name: Set(name.to_string()),
            category: Set(input.category),
            capacity: Set(input.capacity),
            vendor: Set(input.vendor),
            contact: Set(input.contact),
            group_name: Set(input.group_name),
            notes: Set(input.notes),
            daily_rate_estimate: Set(input.daily_rate_estimate.unwrap_or_default()),
            daily_rate_actual: Set(input.daily_rate_actual),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates a resource.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NameRequired`, `InvalidRate` or a database error.
    pub async fn update(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
        input: UpdateResourceInput,
    ) -> Result<resources::Model, ResourceError> {
        let resource = self.get(production_id, kind, id).await?;
        let mut active: resources::ActiveModel = resource.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ResourceError::NameRequired(kind.label()));
            }
            active.name = Set(name);
        }
        if let Some(v) = input.category {
            active.category = Set(v);
        }
        if let Some(v) = input.capacity {
            active.capacity = Set(v);
        }
        if let Some(v) = input.vendor {
            active.vendor = Set(v);
        }
        if let Some(v) = input.contact {
            active.contact = Set(v);
        }
        if let Some(v) = input.group_name {
            active.group_name = Set(v);
        }
        if let Some(v) = input.notes {
            active.notes = Set(v);
        }
        if let Some(v) = input.daily_rate_estimate {
            check_amount("daily_rate_estimate", Some(v))?;
            active.daily_rate_estimate = Set(v);
        }
        if let Some(v) = input.daily_rate_actual {
            check_amount("daily_rate_actual", v)?;
            active.daily_rate_actual = Set(v);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a resource together with its assignments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(
        &self,
        production_id: i32,
        kind: ResourceKind,
        id: i32,
    ) -> Result<(), ResourceError> {
        let result = resources::Entity::delete_many()
            .filter(resources::Column::Id.eq(id))
            .filter(resources::Column::ProductionId.eq(production_id))
            .filter(resources::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ResourceError::NotFound(kind.label()));
        }
        Ok(())
    }
}

//! Function repository.
//!
//! A function is a slot that resources are assigned to. Its `context`
//! tells which tab owns it.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use thiserror::Error;

use super::patch::double_option;
use crate::entities::functions;

/// Errors that can occur during function operations.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// Name is blank.
    #[error("Function name is required")]
    NameRequired,

    /// Function not found in the production.
    #[error("Function not found")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a function.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFunctionInput {
    /// Function name.
    #[serde(default)]
    pub name: String,
    /// Display group, `Special` when omitted.
    pub function_group: Option<String>,
    /// Display color, `#EF4444` when omitted.
    pub color: Option<String>,
    /// Position in listings.
    pub sort_order: Option<i32>,
    /// Default first day.
    pub default_start: Option<String>,
    /// Default last day.
    pub default_end: Option<String>,
    /// Free-text requirements.
    pub specs: Option<String>,
    /// Owning tab, `boats` when omitted.
    pub context: Option<String>,
}

/// Input for updating a function.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFunctionInput {
    /// New name.
    pub name: Option<String>,
    /// New group.
    pub function_group: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New position.
    pub sort_order: Option<i32>,
    /// New default first day.
    #[serde(default, deserialize_with = "double_option")]
    pub default_start: Option<Option<String>>,
    /// New default last day.
    #[serde(default, deserialize_with = "double_option")]
    pub default_end: Option<Option<String>>,
    /// New requirements.
    #[serde(default, deserialize_with = "double_option")]
    pub specs: Option<Option<String>>,
    /// New owning tab.
    pub context: Option<String>,
}

/// Function repository.
#[derive(Debug, Clone)]
pub struct FunctionRepository {
    db: DatabaseConnection,
}

impl FunctionRepository {
    /// Creates a new function repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's functions by sort order, optionally for one context.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        production_id: i32,
        context: Option<&str>,
    ) -> Result<Vec<functions::Model>, DbErr> {
        let mut query =
            functions::Entity::find().filter(functions::Column::ProductionId.eq(production_id));
        if let Some(context) = context {
            query = query.filter(functions::Column::Context.eq(context));
        }
        query
            .order_by_asc(functions::Column::SortOrder)
            .order_by_asc(functions::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a function within a production.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn get(&self, production_id: i32, id: i32) -> Result<functions::Model, FunctionError> {
        functions::Entity::find_by_id(id)
            .filter(functions::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(FunctionError::NotFound(id))
    }

    /// Creates a function.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired` or a database error.
    pub async fn create(
        &self,
        production_id: i32,
        input: CreateFunctionInput,
    ) -> Result<functions::Model, FunctionError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(FunctionError::NameRequired);
        }

        Ok(functions::ActiveModel {
            production_id: Set(production_id),
            name: Set(name.to_string()),
            function_group: Set(input.function_group.unwrap_or_else(|| "Special".to_string())),
            color: Set(input.color.unwrap_or_else(|| "#EF4444".to_string())),
            sort_order: Set(input.sort_order.unwrap_or_default()),
            default_start: Set(input.default_start),
            default_end: Set(input.default_end),
            specs: Set(input.specs),
            context: Set(input.context.unwrap_or_else(|| "boats".to_string())),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates a function.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NameRequired` or a database error.
    pub async fn update(
        &self,
        production_id: i32,
        id: i32,
        input: UpdateFunctionInput,
    ) -> Result<functions::Model, FunctionError> {
        let function = self.get(production_id, id).await?;
        let mut active: functions::ActiveModel = function.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(FunctionError::NameRequired);
            }
            active.name = Set(name);
        }
        if let Some(group) = input.function_group {
            active.function_group = Set(group);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(default_start) = input.default_start {
            active.default_start = Set(default_start);
        }
        if let Some(default_end) = input.default_end {
            active.default_end = Set(default_end);
        }
        if let Some(specs) = input.specs {
            active.specs = Set(specs);
        }
        if let Some(context) = input.context {
            active.context = Set(context);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a function together with its assignments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, production_id: i32, id: i32) -> Result<(), FunctionError> {
        let result = functions::Entity::delete_many()
            .filter(functions::Column::Id.eq(id))
            .filter(functions::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(FunctionError::NotFound(id));
        }
        Ok(())
    }
}

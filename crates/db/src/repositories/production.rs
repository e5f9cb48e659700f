//! Production and department repository.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;
use thiserror::Error;

use super::patch::double_option;
use crate::entities::{departments, productions, project_memberships};

/// Departments every production starts with.
pub const DEFAULT_DEPARTMENTS: [&str; 8] = [
    "BOATS",
    "FNB",
    "FUEL",
    "GROUND_TRANSPORT",
    "GUARDS",
    "HELPERS",
    "LOCATIONS",
    "OUT",
];

/// Accepted production statuses.
pub const PRODUCTION_STATUSES: [&str; 4] = ["active", "archived", "draft", "closed"];

/// Errors that can occur during production operations.
#[derive(Debug, Error)]
pub enum ProductionError {
    /// Name is blank.
    #[error("Project name is required")]
    NameRequired,

    /// Another production already uses the name.
    #[error("A project named '{0}' already exists")]
    DuplicateName(String),

    /// Status is not one of [`PRODUCTION_STATUSES`].
    #[error("Invalid status. Must be one of: active, archived, draft, closed")]
    InvalidStatus(String),

    /// Production not found.
    #[error("Project not found")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a production.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductionInput {
    /// Production name.
    #[serde(default)]
    pub name: String,
    /// First shooting day.
    pub start_date: Option<String>,
    /// Last shooting day.
    pub end_date: Option<String>,
    /// Shooting site.
    pub site: Option<String>,
    /// Initial status, `draft` when omitted.
    pub status: Option<String>,
}

/// Input for updating a production.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductionInput {
    /// New name.
    pub name: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New first day.
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<String>>,
    /// New last day.
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<String>>,
    /// New site.
    #[serde(default, deserialize_with = "double_option")]
    pub site: Option<Option<String>>,
}

/// Production repository.
#[derive(Debug, Clone)]
pub struct ProductionRepository {
    db: DatabaseConnection,
}

impl ProductionRepository {
    /// Creates a new production repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every production, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<productions::Model>, DbErr> {
        productions::Entity::find()
            .order_by_asc(productions::Column::Name)
            .all(&self.db)
            .await
    }

    /// Lists the productions a user is a member of, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<productions::Model>, DbErr> {
        productions::Entity::find()
            .join(
                JoinType::InnerJoin,
                productions::Relation::ProjectMemberships.def(),
            )
            .filter(project_memberships::Column::UserId.eq(user_id))
            .order_by_asc(productions::Column::Name)
            .all(&self.db)
            .await
    }

    /// Lists every production with its member count, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_with_member_counts(
        &self,
    ) -> Result<Vec<(productions::Model, u64)>, DbErr> {
        let memberships = project_memberships::Entity::find().all(&self.db).await?;
        let mut counts: HashMap<i32, u64> = HashMap::new();
        for m in &memberships {
            *counts.entry(m.production_id).or_default() += 1;
        }

        let all = self.list_all().await?;
        Ok(all
            .into_iter()
            .map(|p| {
                let count = counts.get(&p.id).copied().unwrap_or_default();
                (p, count)
            })
            .collect())
    }

    /// Finds a production by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<productions::Model>, DbErr> {
        productions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a production by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<productions::Model>, DbErr> {
        productions::Entity::find()
            .filter(productions::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a production and seeds its departments.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired`, `DuplicateName` or `InvalidStatus` on bad
    /// input, or a database error.
    pub async fn create(
        &self,
        input: CreateProductionInput,
    ) -> Result<productions::Model, ProductionError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ProductionError::NameRequired);
        }
        if self.find_by_name(name).await?.is_some() {
            return Err(ProductionError::DuplicateName(name.to_string()));
        }
        let status = input.status.unwrap_or_else(|| "draft".to_string());
        validate_status(&status)?;

        let production = productions::ActiveModel {
            name: Set(name.to_string()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            site: Set(input.site),
            status: Set(status),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.seed_departments(production.id).await?;
        tracing::info!(production_id = production.id, name = %production.name, "Production created");
        Ok(production)
    }

    /// Updates a production.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NameRequired`, `DuplicateName` or
    /// `InvalidStatus`, or a database error.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateProductionInput,
    ) -> Result<productions::Model, ProductionError> {
        let production = self
            .find_by_id(id)
            .await?
            .ok_or(ProductionError::NotFound(id))?;

        let mut active: productions::ActiveModel = production.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ProductionError::NameRequired);
            }
            if let Some(other) = self.find_by_name(&name).await?
                && other.id != id
            {
                return Err(ProductionError::DuplicateName(name));
            }
            active.name = Set(name);
        }
        if let Some(status) = input.status {
            validate_status(&status)?;
            active.status = Set(status);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(site) = input.site {
            active.site = Set(site);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a production and everything scoped to it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, id: i32) -> Result<(), ProductionError> {
        let result = productions::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ProductionError::NotFound(id));
        }
        tracing::info!(production_id = id, "Production deleted");
        Ok(())
    }

    /// Creates the default departments that are missing. Returns how many
    /// were created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn seed_departments(&self, production_id: i32) -> Result<usize, DbErr> {
        let existing = self.list_departments(production_id).await?;
        let mut created = 0;
        for name in DEFAULT_DEPARTMENTS {
            if existing.iter().any(|d| d.name == name) {
                continue;
            }
            departments::ActiveModel {
                production_id: Set(production_id),
                name: Set(name.to_string()),
                status_global: Set("to_complete".to_string()),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
            created += 1;
        }
        Ok(created)
    }

    /// Lists a production's departments, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_departments(
        &self,
        production_id: i32,
    ) -> Result<Vec<departments::Model>, DbErr> {
        departments::Entity::find()
            .filter(departments::Column::ProductionId.eq(production_id))
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await
    }
}

fn validate_status(status: &str) -> Result<(), ProductionError> {
    if PRODUCTION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ProductionError::InvalidStatus(status.to_string()))
    }
}

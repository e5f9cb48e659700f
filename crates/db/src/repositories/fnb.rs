//! Food and beverage categories, items and daily entries.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use shootlogix_core::budget::{
    BudgetError, FnbBudget, FnbCategoryInput, FnbEntryInput, FnbEntryType, FnbItemInput,
    check_amount, compute_fnb_budget,
};
use shootlogix_core::schedule::is_iso_date;
use thiserror::Error;

use super::patch::double_option;
use crate::entities::{fnb_categories, fnb_entries, fnb_items};

/// Errors that can occur during FNB operations.
#[derive(Debug, Error)]
pub enum FnbError {
    /// Name is blank.
    #[error("name is required")]
    NameRequired,

    /// A category with this name already exists in the production.
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    /// A required reference is missing.
    #[error("{0} is required")]
    Required(&'static str),

    /// Category not found in the production.
    #[error("Category not found")]
    CategoryNotFound(i32),

    /// Item not found in the production.
    #[error("Item not found")]
    ItemNotFound(i32),

    /// Entry not found in the production.
    #[error("Entry not found")]
    EntryNotFound(i32),

    /// Entry type is unknown, or a price or quantity is out of range.
    #[error(transparent)]
    InvalidEntry(#[from] BudgetError),

    /// Date is not `YYYY-MM-DD`.
    #[error("date must be YYYY-MM-DD")]
    InvalidDate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFnbCategoryInput {
    /// Category name, unique per production.
    #[serde(default)]
    pub name: String,
    /// Display color.
    pub color: Option<String>,
    /// Position in listings.
    pub sort_order: Option<i32>,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFnbCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New position.
    pub sort_order: Option<i32>,
}

/// Input for creating an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFnbItemInput {
    /// Owning category.
    pub category_id: Option<i32>,
    /// Item name.
    #[serde(default)]
    pub name: String,
    /// Unit of measure, `unit` when omitted.
    pub unit: Option<String>,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
    /// Position in listings.
    pub sort_order: Option<i32>,
}

/// Input for updating an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFnbItemInput {
    /// New category.
    pub category_id: Option<i32>,
    /// New name.
    pub name: Option<String>,
    /// New unit.
    pub unit: Option<String>,
    /// New price.
    pub unit_price: Option<Decimal>,
    /// New notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    /// New position.
    pub sort_order: Option<i32>,
}

/// Input for setting the quantity of one item on one day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertFnbEntryInput {
    /// Item.
    pub item_id: Option<i32>,
    /// `purchase` or `consumption`.
    #[serde(default)]
    pub entry_type: String,
    /// Day.
    #[serde(default)]
    pub date: String,
    /// Quantity.
    pub quantity: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
}

/// FNB repository.
#[derive(Debug, Clone)]
pub struct FnbRepository {
    db: DatabaseConnection,
}

impl FnbRepository {
    /// Creates a new FNB repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a production's categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        production_id: i32,
    ) -> Result<Vec<fnb_categories::Model>, DbErr> {
        fnb_categories::Entity::find()
            .filter(fnb_categories::Column::ProductionId.eq(production_id))
            .order_by_asc(fnb_categories::Column::SortOrder)
            .order_by_asc(fnb_categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired`, `DuplicateCategory` or a database error.
    pub async fn create_category(
        &self,
        production_id: i32,
        input: CreateFnbCategoryInput,
    ) -> Result<fnb_categories::Model, FnbError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(FnbError::NameRequired);
        }
        self.check_category_name(production_id, &name, None).await?;

        Ok(fnb_categories::ActiveModel {
            production_id: Set(production_id),
            name: Set(name),
            color: Set(input.color.unwrap_or_else(|| "#F97316".to_string())),
            sort_order: Set(input.sort_order.unwrap_or_default()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound`, `NameRequired`, `DuplicateCategory` or a
    /// database error.
    pub async fn update_category(
        &self,
        production_id: i32,
        id: i32,
        input: UpdateFnbCategoryInput,
    ) -> Result<fnb_categories::Model, FnbError> {
        let category = self.category(production_id, id).await?;
        let mut active: fnb_categories::ActiveModel = category.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(FnbError::NameRequired);
            }
            self.check_category_name(production_id, &name, Some(id))
                .await?;
            active.name = Set(name);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category with its items and entries.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` or a database error.
    pub async fn delete_category(&self, production_id: i32, id: i32) -> Result<(), FnbError> {
        let result = fnb_categories::Entity::delete_many()
            .filter(fnb_categories::Column::Id.eq(id))
            .filter(fnb_categories::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(FnbError::CategoryNotFound(id));
        }
        Ok(())
    }

    /// Lists a production's items, optionally for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_items(
        &self,
        production_id: i32,
        category_id: Option<i32>,
    ) -> Result<Vec<fnb_items::Model>, DbErr> {
        let mut query =
            fnb_items::Entity::find().filter(fnb_items::Column::ProductionId.eq(production_id));
        if let Some(category_id) = category_id {
            query = query.filter(fnb_items::Column::CategoryId.eq(category_id));
        }
        query
            .order_by_asc(fnb_items::Column::SortOrder)
            .order_by_asc(fnb_items::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates an item.
    ///
    /// # Errors
    ///
    /// Returns `NameRequired`, `CategoryNotFound` or a database error.
    pub async fn create_item(
        &self,
        production_id: i32,
        input: CreateFnbItemInput,
    ) -> Result<fnb_items::Model, FnbError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(FnbError::NameRequired);
        }
        let category_id = input.category_id.ok_or(FnbError::Required("category_id"))?;
        check_amount("unit_price", input.unit_price)?;
        self.category(production_id, category_id).await?;

        Ok(fnb_items::ActiveModel {
            category_id: Set(category_id),
            production_id: Set(production_id),
            name: Set(name),
            unit: Set(input.unit.unwrap_or_else(|| "unit".to_string())),
            unit_price: Set(input.unit_price.unwrap_or_default()),
            notes: Set(input.notes),
            sort_order: Set(input.sort_order.unwrap_or_default()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Updates an item.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, `CategoryNotFound`, `NameRequired` or a
    /// database error.
    pub async fn update_item(
        &self,
        production_id: i32,
        id: i32,
        input: UpdateFnbItemInput,
    ) -> Result<fnb_items::Model, FnbError> {
        let item = self.item(production_id, id).await?;
        let mut active: fnb_items::ActiveModel = item.into();

        if let Some(category_id) = input.category_id {
            self.category(production_id, category_id).await?;
            active.category_id = Set(category_id);
        }
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(FnbError::NameRequired);
            }
            active.name = Set(name);
        }
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        if let Some(price) = input.unit_price {
            check_amount("unit_price", Some(price))?;
            active.unit_price = Set(price);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an item with its entries.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or a database error.
    pub async fn delete_item(&self, production_id: i32, id: i32) -> Result<(), FnbError> {
        let result = fnb_items::Entity::delete_many()
            .filter(fnb_items::Column::Id.eq(id))
            .filter(fnb_items::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(FnbError::ItemNotFound(id));
        }
        Ok(())
    }

    /// Lists a production's entries by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(&self, production_id: i32) -> Result<Vec<fnb_entries::Model>, DbErr> {
        fnb_entries::Entity::find()
            .filter(fnb_entries::Column::ProductionId.eq(production_id))
            .order_by_asc(fnb_entries::Column::Date)
            .order_by_asc(fnb_entries::Column::ItemId)
            .all(&self.db)
            .await
    }

    /// Sets the quantity of an item for one day and entry type.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, `InvalidEntry`, `InvalidDate` or a database
    /// error.
    pub async fn upsert_entry(
        &self,
        production_id: i32,
        input: UpsertFnbEntryInput,
    ) -> Result<fnb_entries::Model, FnbError> {
        let entry_type: FnbEntryType = input.entry_type.parse()?;
        if !is_iso_date(&input.date) {
            return Err(FnbError::InvalidDate);
        }
        let item_id = input.item_id.ok_or(FnbError::Required("item_id"))?;
        check_amount("quantity", input.quantity)?;
        self.item(production_id, item_id).await?;
        let quantity = input.quantity.unwrap_or_default();

        let existing = fnb_entries::Entity::find()
            .filter(fnb_entries::Column::ItemId.eq(item_id))
            .filter(fnb_entries::Column::EntryType.eq(entry_type.as_str()))
            .filter(fnb_entries::Column::Date.eq(&input.date))
            .one(&self.db)
            .await?;

        if let Some(row) = existing {
            let mut active: fnb_entries::ActiveModel = row.into();
            active.quantity = Set(quantity);
            if input.notes.is_some() {
                active.notes = Set(input.notes);
            }
            return Ok(active.update(&self.db).await?);
        }

        Ok(fnb_entries::ActiveModel {
            item_id: Set(item_id),
            production_id: Set(production_id),
            entry_type: Set(entry_type.as_str().to_string()),
            date: Set(input.date),
            quantity: Set(quantity),
            notes: Set(input.notes),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or a database error.
    pub async fn delete_entry(&self, production_id: i32, id: i32) -> Result<(), FnbError> {
        let result = fnb_entries::Entity::delete_many()
            .filter(fnb_entries::Column::Id.eq(id))
            .filter(fnb_entries::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(FnbError::EntryNotFound(id));
        }
        Ok(())
    }

    /// Loads categories, items and entries for budget computations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn budget_inputs(
        &self,
        production_id: i32,
    ) -> Result<(Vec<FnbCategoryInput>, Vec<FnbItemInput>, Vec<FnbEntryInput>), DbErr> {
        let categories = self
            .list_categories(production_id)
            .await?
            .into_iter()
            .map(|c| FnbCategoryInput {
                id: c.id,
                name: c.name,
                color: Some(c.color),
            })
            .collect();
        let items = self
            .list_items(production_id, None)
            .await?
            .into_iter()
            .map(|i| FnbItemInput {
                id: i.id,
                category_id: i.category_id,
                unit_price: Some(i.unit_price),
            })
            .collect();
        let entries = self
            .list_entries(production_id)
            .await?
            .into_iter()
            .filter_map(|e| {
                let entry_type = e.entry_type.parse().ok()?;
                Some(FnbEntryInput {
                    item_id: e.item_id,
                    entry_type,
                    quantity: Some(e.quantity),
                })
            })
            .collect();
        Ok((categories, items, entries))
    }

    /// Computes the FNB budget of a production.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn budget(&self, production_id: i32) -> Result<FnbBudget, DbErr> {
        let (categories, items, entries) = self.budget_inputs(production_id).await?;
        Ok(compute_fnb_budget(&categories, &items, &entries))
    }

    async fn category(
        &self,
        production_id: i32,
        id: i32,
    ) -> Result<fnb_categories::Model, FnbError> {
        fnb_categories::Entity::find_by_id(id)
            .filter(fnb_categories::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(FnbError::CategoryNotFound(id))
    }

    async fn item(&self, production_id: i32, id: i32) -> Result<fnb_items::Model, FnbError> {
        fnb_items::Entity::find_by_id(id)
            .filter(fnb_items::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await?
            .ok_or(FnbError::ItemNotFound(id))
    }

    async fn check_category_name(
        &self,
        production_id: i32,
        name: &str,
        except: Option<i32>,
    ) -> Result<(), FnbError> {
        let existing = fnb_categories::Entity::find()
            .filter(fnb_categories::Column::ProductionId.eq(production_id))
            .filter(fnb_categories::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        match existing {
            Some(c) if Some(c.id) != except => Err(FnbError::DuplicateCategory(name.to_string())),
            _ => Ok(()),
        }
    }
}

//! `SeaORM` Entity for fnb_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fnb_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub production_id: i32,
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub notes: Option<String>,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fnb_categories::Entity",
        from = "Column::CategoryId",
        to = "super::fnb_categories::Column::Id"
    )]
    FnbCategories,
}

impl Related<super::fnb_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FnbCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

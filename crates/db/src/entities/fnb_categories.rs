//! `SeaORM` Entity for fnb_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fnb_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub production_id: i32,
    pub name: String,
    pub color: String,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fnb_items::Entity")]
    FnbItems,
}

impl Related<super::fnb_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FnbItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for resources table.
//!
//! One table holds every assignable resource; `kind` tells boats, picture
//! boats, security boats, vehicles, helpers and camp guards apart.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub production_id: i32,
    pub kind: String,
    pub name: String,
    pub category: Option<String>,
    pub capacity: Option<String>,
    pub vendor: Option<String>,
    pub contact: Option<String>,
    pub group_name: Option<String>,
    pub notes: Option<String>,
    pub daily_rate_estimate: Decimal,
    pub daily_rate_actual: Option<Decimal>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

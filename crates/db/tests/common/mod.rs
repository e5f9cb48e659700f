//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use shootlogix_db::migration::Migrator;
use shootlogix_db::repositories::{
    CreateFunctionInput, CreateProductionInput, CreateResourceInput, FunctionRepository,
    ProductionRepository, ResourceRepository,
};
use shootlogix_core::resource::ResourceKind;

/// Opens a fresh in-memory database with the schema applied.
pub async fn test_db() -> DatabaseConnection {
    // One connection, so every query sees the same in-memory database.
    let db = shootlogix_db::connect_with("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Creates a production and returns its ID.
pub async fn create_production(db: &DatabaseConnection, name: &str) -> i32 {
    ProductionRepository::new(db.clone())
        .create(CreateProductionInput {
            name: name.to_string(),
            status: Some("active".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create production")
        .id
}

/// Creates a function in the `boats` context and returns its ID.
pub async fn create_function(db: &DatabaseConnection, production_id: i32, name: &str) -> i32 {
    FunctionRepository::new(db.clone())
        .create(
            production_id,
            CreateFunctionInput {
                name: name.to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create function")
        .id
}

/// Creates a resource with an estimate rate and returns its ID.
pub async fn create_resource(
    db: &DatabaseConnection,
    production_id: i32,
    kind: ResourceKind,
    name: &str,
    rate: rust_decimal::Decimal,
) -> i32 {
    ResourceRepository::new(db.clone())
        .create(
            production_id,
            kind,
            CreateResourceInput {
                name: name.to_string(),
                vendor: Some("AQUA SERVICES".to_string()),
                daily_rate_estimate: Some(rate),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create resource")
        .id
}

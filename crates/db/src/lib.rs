//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions over SQLite
//! - Repository abstractions for data access
//! - Database migrations
//! - Default account seeding

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use repositories::{
    AssignmentRepository, BudgetRepository, FnbRepository, FunctionRepository, GuardRepository,
    HistoryRepository, LocationRepository, MembershipRepository, ProductionRepository,
    RefreshTokenRepository, ResourceRepository, ShootingDayRepository, UserRepository,
};
pub use seed::seed_default_accounts;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(opts).await
}

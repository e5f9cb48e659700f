//! Schema migrations for the SQLite store.
//!
//! The server applies them on start; `migrator` exposes the sea-orm-migration CLI.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_initial;

/// Every ShootLogix migration, oldest first.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260301_000001_initial::Migration)]
    }
}

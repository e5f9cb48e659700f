//! Default account seeder for ShootLogix.
//!
//! Ensures the KLAS7 production and the four default accounts exist.
//! Running it twice changes nothing.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shootlogix_db::{connect, seed::DEFAULT_ACCOUNTS, seed_default_accounts};
use shootlogix_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "shootlogix=info".into()),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!("Connecting to database...");
    let db = connect(&config.database.url).await?;

    let report = seed_default_accounts(&db).await?;
    info!(
        production_created = report.production_created,
        users_created = report.users_created,
        memberships_created = report.memberships_created,
        "Seeding complete"
    );
    for account in DEFAULT_ACCOUNTS {
        info!(nickname = account.nickname, role = %account.role, "Default account");
    }

    Ok(())
}

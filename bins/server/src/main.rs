//! ShootLogix API Server
//!
//! Main entry point for the ShootLogix backend service.

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shootlogix_api::{AppState, create_router, rate_limit::LoginRateLimiter};
use shootlogix_db::{connect_with, migration::Migrator, seed_default_accounts};
use shootlogix_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shootlogix=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    if config.auth.seed_default_accounts {
        let report = seed_default_accounts(&db).await?;
        info!(
            production_created = report.production_created,
            users_created = report.users_created,
            memberships_created = report.memberships_created,
            "Default accounts checked"
        );
    }

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
        #[allow(clippy::cast_possible_wrap)]
        refresh_token_expires_days: (config.jwt.refresh_token_expiry_secs / 86400) as i64,
    };
    let login_limiter = LoginRateLimiter::new(
        config.auth.login_max_attempts,
        Duration::from_secs(config.auth.login_window_secs),
    );

    let state = AppState::new(db, JwtService::new(jwt_config), login_limiter);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    // Peer addresses feed the login rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication and RBAC middleware
//! - Login rate limiting
//! - CSV and JSON exports

pub mod error;
pub mod extract;
pub mod middleware;
pub mod rate_limit;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use rate_limit::LoginRateLimiter;
use shootlogix_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Failed login attempts per client.
    pub login_limiter: Arc<LoginRateLimiter>,
}

impl AppState {
    /// Bundles the shared services.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, login_limiter: LoginRateLimiter) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            login_limiter: Arc::new(login_limiter),
        }
    }

    /// Returns a connection handle for building repositories.
    #[must_use]
    pub fn conn(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

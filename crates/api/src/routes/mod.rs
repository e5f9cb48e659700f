//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{access_middleware, auth_middleware},
};

pub mod admin;
pub mod assignments;
pub mod auth;
pub mod budget;
pub mod exports;
pub mod fnb;
pub mod functions;
pub mod guards;
pub mod health;
pub mod history;
pub mod locations;
pub mod productions;
pub mod resources;
pub mod shooting_days;
pub mod working_days;

/// Creates the API router with public, authenticated and role-checked routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Role-checked routes: authentication first, then RBAC
    let protected_routes = Router::new()
        .merge(working_days::routes())
        .merge(admin::routes())
        .merge(productions::routes())
        .merge(shooting_days::routes())
        .merge(functions::routes())
        .merge(resources::routes())
        .merge(assignments::routes())
        .merge(history::routes())
        .merge(locations::routes())
        .merge(guards::routes())
        .merge(fnb::routes())
        .merge(budget::routes())
        .merge(exports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Authenticated but outside any tab
    let account_routes = auth::account_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(account_routes)
        .merge(protected_routes)
}

//! Role resolution and tab permission checks.
//!
//! Runs after [`auth_middleware`](super::auth_middleware). The caller's role
//! comes from `is_admin` or from the membership in the production named in
//! the path; paths outside a production use READER.

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{AppState, error::ApiError};
use shootlogix_core::{
    auth::Role,
    rbac::{check_role_access, production_id_from_path},
};
use shootlogix_db::{MembershipRepository, ProductionRepository};
use shootlogix_shared::Claims;

/// The role the caller acts with on this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentRole(pub Role);

/// Access middleware that resolves the caller's role and applies RBAC.
pub async fn access_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(claims) = request.extensions().get::<Claims>().cloned() else {
        return ApiError::unauthorized("NO_TOKEN", "Authentication required").into_response();
    };
    // Nested routers see a stripped path; RBAC works on the full one.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path(), |uri| uri.0.path())
        .to_string();
    let method = request.method().as_str().to_string();

    match authorize(&state, &claims, &path, &method).await {
        Ok(role) => {
            request.extensions_mut().insert(CurrentRole(role));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

async fn authorize(
    state: &AppState,
    claims: &Claims,
    path: &str,
    method: &str,
) -> Result<Role, ApiError> {
    let production_id = production_id_from_path(path);
    if let Some(id) = production_id {
        ProductionRepository::new(state.conn())
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Production not found"))?;
    }

    let role = if claims.is_admin {
        Role::Admin
    } else if let Some(id) = production_id {
        MembershipRepository::new(state.conn())
            .role_for(claims.user_id, id)
            .await?
            .ok_or_else(|| {
                debug!(user_id = claims.user_id, production_id = id, "Not a member");
                ApiError::new(
                    StatusCode::FORBIDDEN,
                    "NOT_MEMBER",
                    "You are not a member of this project",
                )
            })?
    } else {
        Role::Reader
    };

    check_role_access(role, path, method).map_err(|denied| {
        warn!(user_id = claims.user_id, role = %role, path, method, "Access denied");
        ApiError::forbidden(denied.to_string())
    })?;
    Ok(role)
}

impl<S> FromRequestParts<S> for CurrentRole
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or_else(|| ApiError::forbidden("Access denied"))
    }
}

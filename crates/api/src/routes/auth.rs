//! Authentication routes for login, token refresh, logout and the current user.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::Json,
    middleware::{AuthUser, ClientIp},
};
use shootlogix_core::auth::{PasswordError, verify_password};
use shootlogix_db::{MembershipRepository, RefreshTokenRepository, UserRepository, entities::users};
use shootlogix_shared::auth::{
    AuthUserInfo, LoginRequest, LoginResponse, LogoutRequest, MeResponse, RefreshRequest,
    RefreshResponse,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Creates the auth routes that need a valid access token.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("INVALID_CREDENTIALS", "Invalid credentials")
}

fn user_info(user: &users::Model) -> AuthUserInfo {
    AuthUserInfo {
        id: user.id,
        nickname: user.nickname.clone(),
        is_admin: user.is_admin,
    }
}

/// POST /auth/login - Authenticate with nickname and password.
async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if state.login_limiter.is_limited(&ip) {
        warn!(ip = %ip, "Login rate limit reached");
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            "Too many login attempts. Please try again later.",
        ));
    }

    let nickname = payload.nickname.trim();
    if nickname.is_empty() || payload.password.is_empty() {
        state.login_limiter.record_attempt(&ip);
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "MISSING_FIELDS",
            "Nickname and password are required",
        ));
    }

    let Some(user) = UserRepository::new(state.conn())
        .find_by_nickname(nickname)
        .await?
    else {
        info!(nickname = %nickname, "Login attempt for unknown user");
        state.login_limiter.record_attempt(&ip);
        return Err(invalid_credentials());
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) | Err(PasswordError::InvalidHash) => {
            info!(user_id = user.id, "Failed login attempt - invalid password");
            state.login_limiter.record_attempt(&ip);
            return Err(invalid_credentials());
        }
        Err(e) => return Err(ApiError::internal(e)),
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.nickname, user.is_admin)
        .map_err(ApiError::internal)?;
    let expires_at = Utc::now() + state.jwt_service.refresh_token_ttl();
    let refresh_token = RefreshTokenRepository::new(state.conn())
        .create(user.id, expires_at)
        .await?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_info(&user),
    }))
}

/// POST /auth/refresh - Exchange a refresh token for a new access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    if payload.refresh_token.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "MISSING_TOKEN",
            "Refresh token required",
        ));
    }

    let tokens = RefreshTokenRepository::new(state.conn());
    let Some(stored) = tokens.find_by_token(&payload.refresh_token).await? else {
        return Err(ApiError::unauthorized("INVALID_TOKEN", "Invalid refresh token"));
    };

    if stored.expires_at < Utc::now() {
        tokens.delete(stored.id).await?;
        return Err(ApiError::unauthorized("TOKEN_EXPIRED", "Refresh token expired"));
    }

    let Some(user) = UserRepository::new(state.conn())
        .find_by_id(stored.user_id)
        .await?
    else {
        tokens.delete(stored.id).await?;
        return Err(ApiError::unauthorized("USER_NOT_FOUND", "User not found"));
    };

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.nickname, user.is_admin)
        .map_err(ApiError::internal)?;

    Ok(Json(RefreshResponse {
        access_token,
        user: user_info(&user),
    }))
}

/// POST /auth/logout - Revoke a refresh token.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> ApiResult<Json<Value>> {
    if let Some(token) = payload.refresh_token.filter(|t| !t.is_empty()) {
        RefreshTokenRepository::new(state.conn())
            .delete_by_token(&token)
            .await?;
    }
    Ok(Json(json!({ "message": "Logged out" })))
}

/// GET /auth/me - Current user and the productions they can open.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MeResponse>> {
    let Some(user) = UserRepository::new(state.conn())
        .find_by_id(auth.user_id())
        .await?
    else {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "User not found",
        ));
    };

    let memberships = MembershipRepository::new(state.conn())
        .memberships_for(user.id, user.is_admin)
        .await?;

    Ok(Json(MeResponse {
        id: user.id,
        nickname: user.nickname,
        is_admin: user.is_admin,
        memberships,
    }))
}

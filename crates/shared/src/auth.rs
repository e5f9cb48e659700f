//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of token a set of claims was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived bearer token for API calls.
    Access,
    /// Any other token kind; never accepted by the API.
    #[serde(other)]
    Other,
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as a string).
    pub sub: String,
    /// Numeric user ID.
    pub user_id: i32,
    /// User nickname.
    pub nickname: String,
    /// Whether the user is a global administrator.
    pub is_admin: bool,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Token kind.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new access claims for a user.
    #[must_use]
    pub fn new(user_id: i32, nickname: &str, is_admin: bool, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            user_id,
            nickname: nickname.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type: TokenType::Access,
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.user_id
    }
}

/// Login request payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// User nickname.
    #[serde(default)]
    pub nickname: String,
    /// User password.
    #[serde(default)]
    pub password: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    #[serde(default)]
    pub refresh_token: String,
}

/// Logout request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to invalidate.
    pub refresh_token: Option<String>,
}

/// User summary embedded in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserInfo {
    /// User ID.
    pub id: i32,
    /// User nickname.
    pub nickname: String,
    /// Whether the user is a global administrator.
    pub is_admin: bool,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Authenticated user info.
    pub user: AuthUserInfo,
}

/// Refresh response payload. The refresh token itself is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Authenticated user info.
    pub user: AuthUserInfo,
}

/// A user's membership in a production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipInfo {
    /// Production ID.
    pub production_id: i32,
    /// Production name.
    pub production_name: String,
    /// Production status.
    pub production_status: Option<String>,
    /// Role held in the production.
    pub role: String,
}

/// Response for the current-user endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// User ID.
    pub id: i32,
    /// User nickname.
    pub nickname: String,
    /// Whether the user is a global administrator.
    pub is_admin: bool,
    /// Productions the user can open.
    pub memberships: Vec<MembershipInfo>,
}

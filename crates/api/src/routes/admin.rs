//! User, project and membership administration. ADMIN only.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::Json,
    middleware::AuthUser,
};
use shootlogix_core::auth::{Role, hash_password, validate_nickname, validate_password};
use shootlogix_db::{
    MembershipRepository, ProductionRepository, UserRepository,
    entities::{productions, users},
    repositories::{CreateProductionInput, MemberView, UpdateProductionInput, UserWithMemberships},
};

/// Creates the admin routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/{user_id}", axum::routing::delete(delete_user))
        .route("/admin/users/{user_id}/password", put(reset_password))
        .route("/admin/projects", get(list_projects).post(create_project))
        .route("/admin/projects/{project_id}", put(update_project))
        .route(
            "/admin/projects/{project_id}/members",
            get(list_members).post(add_member),
        )
        .route(
            "/admin/projects/{project_id}/members/{user_id}",
            put(update_member).delete(remove_member),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    #[serde(default)]
    pub nickname: String,
    /// Initial password.
    #[serde(default)]
    pub password: String,
    /// Global administrator flag.
    #[serde(default)]
    pub is_admin: bool,
}

/// Request body for a password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// New password.
    #[serde(default)]
    pub password: String,
}

/// Request body for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name.
    #[serde(default)]
    pub name: String,
    /// First shooting date.
    pub start_date: Option<String>,
    /// Last shooting date.
    pub end_date: Option<String>,
    /// Shooting site.
    pub site: Option<String>,
}

/// Request body for adding a member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// Nickname of the user to add.
    #[serde(default)]
    pub nickname: String,
    /// Role name, READER when omitted.
    pub role: Option<String>,
}

/// Request body for changing a member's role.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    /// New role name.
    #[serde(default)]
    pub role: String,
}

/// A project with its member count.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    /// The project.
    #[serde(flatten)]
    pub project: productions::Model,
    /// Number of members.
    pub member_count: u64,
}

// ============================================================================
// Helpers
// ============================================================================

fn require_admin(auth: &AuthUser) -> ApiResult<()> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}

fn parse_role(role: &str) -> ApiResult<Role> {
    role.parse::<Role>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

async fn find_project(state: &AppState, project_id: i32) -> ApiResult<productions::Model> {
    ProductionRepository::new(state.conn())
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

// ============================================================================
// Users
// ============================================================================

/// GET /admin/users - Every user with their memberships.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserWithMemberships>>> {
    require_admin(&auth)?;
    let users = MembershipRepository::new(state.conn())
        .list_users_with_memberships()
        .await?;
    Ok(Json(users))
}

/// POST /admin/users - Create an account.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<users::Model>)> {
    require_admin(&auth)?;
    let nickname = validate_nickname(&payload.nickname)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_password(&payload.password).map_err(|e| ApiError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.conn());
    if repo.nickname_exists(nickname).await? {
        return Err(ApiError::conflict(format!(
            "User '{nickname}' already exists"
        )));
    }

    let hash = hash_password(&payload.password).map_err(ApiError::internal)?;
    let user = repo.create(nickname, &hash, payload.is_admin).await?;
    info!(user_id = user.id, nickname = %user.nickname, by = auth.user_id(), "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /admin/users/{id}/password - Reset a password.
async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    require_admin(&auth)?;
    validate_password(&payload.password).map_err(|e| ApiError::validation(e.to_string()))?;

    let hash = hash_password(&payload.password).map_err(ApiError::internal)?;
    if !UserRepository::new(state.conn())
        .update_password(user_id, &hash)
        .await?
    {
        return Err(ApiError::not_found("User not found"));
    }
    info!(user_id, by = auth.user_id(), "Password reset");
    Ok(Json(json!({ "message": "Password updated" })))
}

/// DELETE /admin/users/{id} - Delete an account.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    require_admin(&auth)?;
    if user_id == auth.user_id() {
        return Err(ApiError::validation("You cannot delete your own account"));
    }
    if !UserRepository::new(state.conn()).delete(user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    info!(user_id, by = auth.user_id(), "User deleted");
    Ok(Json(json!({ "message": "User deleted" })))
}

// ============================================================================
// Projects
// ============================================================================

/// GET /admin/projects - Projects with member counts.
async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ProjectSummary>>> {
    require_admin(&auth)?;
    let projects = ProductionRepository::new(state.conn())
        .list_with_member_counts()
        .await?
        .into_iter()
        .map(|(project, member_count)| ProjectSummary {
            project,
            member_count,
        })
        .collect();
    Ok(Json(projects))
}

/// POST /admin/projects - Create an active project owned by the caller.
async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<productions::Model>)> {
    require_admin(&auth)?;
    let project = ProductionRepository::new(state.conn())
        .create(CreateProductionInput {
            name: payload.name,
            start_date: payload.start_date,
            end_date: payload.end_date,
            site: payload.site,
            status: Some("active".to_string()),
        })
        .await?;
    MembershipRepository::new(state.conn())
        .ensure(auth.user_id(), project.id, Role::Admin)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /admin/projects/{id} - Update a project.
async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<i32>,
    Json(payload): Json<UpdateProductionInput>,
) -> ApiResult<Json<productions::Model>> {
    require_admin(&auth)?;
    let project = ProductionRepository::new(state.conn())
        .update(project_id, payload)
        .await?;
    Ok(Json(project))
}

// ============================================================================
// Members
// ============================================================================

/// GET /admin/projects/{id}/members - Members of a project.
async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<i32>,
) -> ApiResult<Json<Vec<MemberView>>> {
    require_admin(&auth)?;
    find_project(&state, project_id).await?;
    let members = MembershipRepository::new(state.conn())
        .list_for_production(project_id)
        .await?;
    Ok(Json(members))
}

/// POST /admin/projects/{id}/members - Add a user to a project.
async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<i32>,
    Json(payload): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_admin(&auth)?;
    let role = parse_role(payload.role.as_deref().unwrap_or(Role::Reader.as_str()))?;
    find_project(&state, project_id).await?;

    let nickname = payload.nickname.trim();
    let Some(user) = UserRepository::new(state.conn())
        .find_by_nickname(nickname)
        .await?
    else {
        return Err(ApiError::not_found(format!("User '{nickname}' not found")));
    };

    MembershipRepository::new(state.conn())
        .add(user.id, project_id, role)
        .await?;
    info!(user_id = user.id, production_id = project_id, role = %role, "Member added");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user_id": user.id,
            "nickname": user.nickname,
            "role": role,
        })),
    ))
}

/// PUT /admin/projects/{id}/members/{user_id} - Change a member's role.
async fn update_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, user_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateMemberRequest>,
) -> ApiResult<Json<Value>> {
    require_admin(&auth)?;
    let role = parse_role(&payload.role)?;
    MembershipRepository::new(state.conn())
        .update_role(user_id, project_id, role)
        .await?;
    Ok(Json(json!({ "user_id": user_id, "role": role })))
}

/// DELETE /admin/projects/{id}/members/{user_id} - Remove a member.
async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, user_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    require_admin(&auth)?;
    if user_id == auth.user_id() {
        return Err(ApiError::validation("You cannot remove yourself"));
    }
    MembershipRepository::new(state.conn())
        .remove(user_id, project_id)
        .await?;
    Ok(Json(json!({ "message": "Member removed" })))
}

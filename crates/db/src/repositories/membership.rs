//! Project membership repository.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use shootlogix_core::auth::Role;
use shootlogix_shared::auth::MembershipInfo;
use thiserror::Error;

use crate::entities::{productions, project_memberships, users};

/// Errors that can occur during membership operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// The user already belongs to the production.
    #[error("User is already a member of this project")]
    AlreadyMember,

    /// No membership for this user and production.
    #[error("Membership not found")]
    NotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A member of a production.
#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    /// User ID.
    pub user_id: i32,
    /// User nickname.
    pub nickname: String,
    /// Whether the user is a global administrator.
    pub is_admin: bool,
    /// Role in the production.
    pub role: String,
}

/// A user and every production they belong to.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithMemberships {
    /// User ID.
    pub id: i32,
    /// User nickname.
    pub nickname: String,
    /// Whether the user is a global administrator.
    pub is_admin: bool,
    /// Account creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Memberships.
    pub memberships: Vec<MembershipInfo>,
}

/// Membership repository.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    db: DatabaseConnection,
}

impl MembershipRepository {
    /// Creates a new membership repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the membership of a user in a production.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        user_id: i32,
        production_id: i32,
    ) -> Result<Option<project_memberships::Model>, DbErr> {
        project_memberships::Entity::find()
            .filter(project_memberships::Column::UserId.eq(user_id))
            .filter(project_memberships::Column::ProductionId.eq(production_id))
            .one(&self.db)
            .await
    }

    /// Returns the role a user holds in a production, if any.
    ///
    /// A stored role that no longer parses counts as no membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn role_for(&self, user_id: i32, production_id: i32) -> Result<Option<Role>, DbErr> {
        Ok(self
            .find(user_id, production_id)
            .await?
            .and_then(|m| m.role.parse().ok()))
    }

    /// Adds a user to a production.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyMember` if the membership exists, or a database error.
    pub async fn add(
        &self,
        user_id: i32,
        production_id: i32,
        role: Role,
    ) -> Result<project_memberships::Model, MembershipError> {
        if self.find(user_id, production_id).await?.is_some() {
            return Err(MembershipError::AlreadyMember);
        }

        Ok(project_memberships::ActiveModel {
            user_id: Set(user_id),
            production_id: Set(production_id),
            role: Set(role.as_str().to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Adds a user to a production unless already a member. Returns true
    /// when a membership was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ensure(&self, user_id: i32, production_id: i32, role: Role) -> Result<bool, DbErr> {
        match self.add(user_id, production_id, role).await {
            Ok(_) => Ok(true),
            Err(MembershipError::AlreadyMember | MembershipError::NotFound) => Ok(false),
            Err(MembershipError::Database(e)) => Err(e),
        }
    }

    /// Changes a member's role.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user is not a member, or a database error.
    pub async fn update_role(
        &self,
        user_id: i32,
        production_id: i32,
        role: Role,
    ) -> Result<project_memberships::Model, MembershipError> {
        let membership = self
            .find(user_id, production_id)
            .await?
            .ok_or(MembershipError::NotFound)?;

        let mut active: project_memberships::ActiveModel = membership.into();
        active.role = Set(role.as_str().to_string());
        Ok(active.update(&self.db).await?)
    }

    /// Removes a user from a production.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user is not a member, or a database error.
    pub async fn remove(&self, user_id: i32, production_id: i32) -> Result<(), MembershipError> {
        let result = project_memberships::Entity::delete_many()
            .filter(project_memberships::Column::UserId.eq(user_id))
            .filter(project_memberships::Column::ProductionId.eq(production_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(MembershipError::NotFound);
        }
        Ok(())
    }

    /// Lists the members of a production, ordered by nickname.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_production(&self, production_id: i32) -> Result<Vec<MemberView>, DbErr> {
        let rows = project_memberships::Entity::find()
            .filter(project_memberships::Column::ProductionId.eq(production_id))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;

        let mut members: Vec<MemberView> = rows
            .into_iter()
            .filter_map(|(m, user)| {
                user.map(|u| MemberView {
                    user_id: u.id,
                    nickname: u.nickname,
                    is_admin: u.is_admin,
                    role: m.role,
                })
            })
            .collect();
        members.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        Ok(members)
    }

    /// Lists the productions a user can open with their role.
    ///
    /// Admins see every production; where they hold no membership the role
    /// reads `ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn memberships_for(
        &self,
        user_id: i32,
        is_admin: bool,
    ) -> Result<Vec<MembershipInfo>, DbErr> {
        let rows = project_memberships::Entity::find()
            .filter(project_memberships::Column::UserId.eq(user_id))
            .find_also_related(productions::Entity)
            .all(&self.db)
            .await?;

        if !is_admin {
            let mut infos: Vec<MembershipInfo> = rows
                .into_iter()
                .filter_map(|(m, p)| p.map(|p| membership_info(&p, m.role)))
                .collect();
            infos.sort_by(|a, b| a.production_name.cmp(&b.production_name));
            return Ok(infos);
        }

        let roles: HashMap<i32, String> = rows
            .into_iter()
            .map(|(m, _)| (m.production_id, m.role))
            .collect();
        let all = productions::Entity::find()
            .order_by_asc(productions::Column::Name)
            .all(&self.db)
            .await?;

        Ok(all
            .iter()
            .map(|p| {
                let role = roles
                    .get(&p.id)
                    .cloned()
                    .unwrap_or_else(|| Role::Admin.as_str().to_string());
                membership_info(p, role)
            })
            .collect())
    }

    /// Lists every user with their memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users_with_memberships(&self) -> Result<Vec<UserWithMemberships>, DbErr> {
        let all_users = users::Entity::find()
            .order_by_asc(users::Column::Nickname)
            .all(&self.db)
            .await?;
        let rows = project_memberships::Entity::find()
            .find_also_related(productions::Entity)
            .all(&self.db)
            .await?;

        let mut by_user: HashMap<i32, Vec<MembershipInfo>> = HashMap::new();
        for (m, p) in rows {
            if let Some(p) = p {
                by_user
                    .entry(m.user_id)
                    .or_default()
                    .push(membership_info(&p, m.role));
            }
        }

        Ok(all_users
            .into_iter()
            .map(|u| UserWithMemberships {
                memberships: by_user.remove(&u.id).unwrap_or_default(),
                id: u.id,
                nickname: u.nickname,
                is_admin: u.is_admin,
                created_at: u.created_at,
            })
            .collect())
    }
}

fn membership_info(production: &productions::Model, role: String) -> MembershipInfo {
    MembershipInfo {
        production_id: production.id,
        production_name: production.name.clone(),
        production_status: Some(production.status.clone()),
        role,
    }
}

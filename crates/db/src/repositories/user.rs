//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::users;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by nickname.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_nickname(&self, nickname: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Nickname.eq(nickname))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists every user, ordered by nickname.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::Nickname)
            .all(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        nickname: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            nickname: Set(nickname.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_admin: Set(is_admin),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        user.insert(&self.db).await
    }

    /// Replaces a user's password hash. Returns false if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_password(&self, id: i32, password_hash: &str) -> Result<bool, DbErr> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(false);
        };

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash.to_string());
        active.update(&self.db).await?;
        Ok(true)
    }

    /// Deletes a user with their memberships and refresh tokens.
    /// Returns false if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Checks if a nickname is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn nickname_exists(&self, nickname: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Nickname.eq(nickname))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

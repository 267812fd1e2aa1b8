//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// User repository.
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

    /// Finds an active user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_username(
        &self,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails. The schema rejects non-admins
    /// without a home base.
    pub async fn create(
        &self,
        username: &str,
        full_name: &str,
        password_hash: &str,
        role: UserRole,
        home_base_id: Option<Uuid>,
    ) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(username.to_string()),
            full_name: Set(full_name.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role),
            home_base_id: Set(home_base_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }
}

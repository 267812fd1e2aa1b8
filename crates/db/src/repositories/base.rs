//! Base repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::bases;

/// Repository for bases.
#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: DatabaseConnection,
}

impl BaseRepository {
    /// Creates a new base repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists bases ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<bases::Model>, DbErr> {
        let mut query = bases::Entity::find().order_by_asc(bases::Column::Name);
        if !include_inactive {
            query = query.filter(bases::Column::IsActive.eq(true));
        }
        query.all(&self.db).await
    }

    /// Finds a base by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<bases::Model>, DbErr> {
        bases::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates an active base.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a unique violation on
    /// the name.
    pub async fn create(&self, name: &str, location: &str) -> Result<bases::Model, DbErr> {
        let now = Utc::now().into();
        bases::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            location: Set(location.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Marks a base inactive. Ledger rows keep referencing it.
    ///
    /// Returns `None` if the base does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<bases::Model>, DbErr> {
        let Some(base) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        if !base.is_active {
            return Ok(Some(base));
        }

        let mut active: bases::ActiveModel = base.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map(Some)
    }
}

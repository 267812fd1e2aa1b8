//! Equipment type repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entities::{equipment_types, sea_orm_active_enums::EquipmentCategory};

/// Repository for equipment types.
#[derive(Debug, Clone)]
pub struct EquipmentTypeRepository {
    db: DatabaseConnection,
}

impl EquipmentTypeRepository {
    /// Creates a new equipment type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists equipment types ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<equipment_types::Model>, DbErr> {
        equipment_types::Entity::find()
            .order_by_asc(equipment_types::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds an equipment type by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<equipment_types::Model>, DbErr> {
        equipment_types::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates an equipment type.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a unique violation on
    /// the name.
    pub async fn create(
        &self,
        name: &str,
        category: EquipmentCategory,
        description: Option<&str>,
    ) -> Result<equipment_types::Model, DbErr> {
        equipment_types::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            category: Set(category),
            description: Set(description.map(ToString::to_string)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }
}

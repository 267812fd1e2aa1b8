//! Purchase ledger repository.

use chrono::Utc;
use garrison_core::ledger::NewPurchase;
use garrison_shared::types::PageRequest;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::LedgerQuery;
use crate::entities::purchases;

/// Repository for purchase records.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists purchases matching `filter`, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &LedgerQuery,
        page: &PageRequest,
    ) -> Result<(Vec<purchases::Model>, u64), DbErr> {
        let query = Self::filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(purchases::Column::PurchaseDate)
            .order_by_desc(purchases::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Records a validated purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        purchase: &NewPurchase,
        total_cost: Decimal,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<purchases::Model, DbErr> {
        purchases::ActiveModel {
            id: Set(Uuid::now_v7()),
            base_id: Set(purchase.base_id.into_inner()),
            equipment_type_id: Set(purchase.equipment_type_id.into_inner()),
            quantity: Set(purchase.quantity),
            unit_cost: Set(purchase.unit_cost),
            total_cost: Set(total_cost),
            purchase_date: Set(purchase.purchase_date),
            notes: Set(notes.map(ToString::to_string)),
            created_by: Set(created_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    fn filtered(filter: &LedgerQuery) -> Select<purchases::Entity> {
        let mut query = purchases::Entity::find();
        if let Some(base_id) = filter.base_id {
            query = query.filter(purchases::Column::BaseId.eq(base_id));
        }
        if let Some(equipment_type_id) = filter.equipment_type_id {
            query = query.filter(purchases::Column::EquipmentTypeId.eq(equipment_type_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(purchases::Column::PurchaseDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(purchases::Column::PurchaseDate.lte(end));
        }
        query
    }
}

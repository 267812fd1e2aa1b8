//! Transfer ledger repository.

use chrono::{NaiveDate, Utc};
use garrison_core::ledger::NewTransfer;
use garrison_shared::types::PageRequest;
use sea_orm::sea_query::{Alias, Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::LedgerQuery;
use crate::entities::{sea_orm_active_enums::TransferStatus, transfers};

/// Repository for transfer records.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists transfers where the filtered base is either side, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &LedgerQuery,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<transfers::Model>, u64), DbErr> {
        let mut query = Self::filtered(filter);
        if let Some(status) = status {
            query = query.filter(transfers::Column::Status.eq(status));
        }
        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(transfers::Column::TransferDate)
            .order_by_desc(transfers::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds a transfer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<transfers::Model>, DbErr> {
        transfers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Records a validated transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        transfer: &NewTransfer,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<transfers::Model, DbErr> {
        let now = Utc::now().into();
        transfers::ActiveModel {
            id: Set(Uuid::now_v7()),
            source_base_id: Set(transfer.source_base_id.into_inner()),
            destination_base_id: Set(transfer.destination_base_id.into_inner()),
            equipment_type_id: Set(transfer.equipment_type_id.into_inner()),
            quantity: Set(transfer.quantity),
            transfer_date: Set(transfer.transfer_date),
            status: Set(transfer.status.into()),
            completed_on: Set(transfer.status.affects_balance().then_some(transfer.transfer_date)),
            notes: Set(notes.map(ToString::to_string)),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Moves a transfer from `from` to `to`.
    ///
    /// A move to `completed` stamps `effective_on` as the completion date,
    /// which is the day the stock changes hands. The update only applies
    /// while the row is still in `from`, so two concurrent changes cannot
    /// both win. Returns `None` when the row was missing or had already moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: TransferStatus,
        to: TransferStatus,
        effective_on: NaiveDate,
    ) -> Result<Option<transfers::Model>, DbErr> {
        let mut update = transfers::Entity::update_many().col_expr(
            transfers::Column::Status,
            Expr::value(to).as_enum(Alias::new("transfer_status")),
        );
        if to == TransferStatus::Completed {
            update = update.col_expr(transfers::Column::CompletedOn, Expr::value(effective_on));
        }

        let result = update
            .filter(transfers::Column::Id.eq(id))
            .filter(transfers::Column::Status.eq(from))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    fn filtered(filter: &LedgerQuery) -> Select<transfers::Entity> {
        let mut query = transfers::Entity::find();
        if let Some(base_id) = filter.base_id {
            query = query.filter(
                Condition::any()
                    .add(transfers::Column::SourceBaseId.eq(base_id))
                    .add(transfers::Column::DestinationBaseId.eq(base_id)),
            );
        }
        if let Some(equipment_type_id) = filter.equipment_type_id {
            query = query.filter(transfers::Column::EquipmentTypeId.eq(equipment_type_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(transfers::Column::TransferDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transfers::Column::TransferDate.lte(end));
        }
        query
    }
}

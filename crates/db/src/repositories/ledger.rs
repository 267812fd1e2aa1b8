//! Ledger read model backing the balance engine.

use std::collections::BTreeMap;

use async_trait::async_trait;
use garrison_core::balance::{
    BaseInfo, EquipmentTypeInfo, LedgerReadError, LedgerReader, LedgerWindow, MovementTotals,
    TypeMovements,
};
use garrison_shared::types::{BaseId, EquipmentTypeId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use tracing::error;
use uuid::Uuid;

use crate::entities::{
    assignments, bases, equipment_types, purchases,
    sea_orm_active_enums::{AssignmentStatus, TransferStatus},
    transfers,
};

#[derive(Debug, FromQueryResult)]
struct TypeSum {
    equipment_type_id: Uuid,
    total: i64,
}

impl From<bases::Model> for BaseInfo {
    fn from(model: bases::Model) -> Self {
        Self {
            id: BaseId::from_uuid(model.id),
            name: model.name,
            location: model.location,
            is_active: model.is_active,
        }
    }
}

impl From<equipment_types::Model> for EquipmentTypeInfo {
    fn from(model: equipment_types::Model) -> Self {
        Self {
            id: EquipmentTypeId::from_uuid(model.id),
            name: model.name,
            category: model.category.into(),
        }
    }
}

/// Movement dated inside the window.
fn dated_within<C: ColumnTrait>(column: C, window: LedgerWindow) -> Condition {
    match window {
        LedgerWindow::Before(cutoff) => Condition::all().add(column.lt(cutoff)),
        LedgerWindow::Within(range) => Condition::all()
            .add(column.gte(range.start()))
            .add(column.lte(range.end())),
    }
}

/// Active assignment still outstanding when the window closes.
fn held_at_close<C: ColumnTrait>(column: C, window: LedgerWindow) -> Condition {
    match window {
        LedgerWindow::Before(cutoff) => Condition::all().add(column.lt(cutoff)),
        LedgerWindow::Within(range) => Condition::all().add(column.lte(range.end())),
    }
}

/// Settled only after the window closes.
fn after_close<C: ColumnTrait>(column: C, window: LedgerWindow) -> Condition {
    match window {
        LedgerWindow::Before(cutoff) => Condition::all().add(column.gte(cutoff)),
        LedgerWindow::Within(range) => Condition::all().add(column.gt(range.end())),
    }
}

fn read_error(operation: &'static str) -> impl FnOnce(DbErr) -> LedgerReadError {
    move |e| {
        error!(error = %e, operation, "Ledger read failed");
        LedgerReadError::new(e.to_string())
    }
}

/// `SeaORM` implementation of [`LedgerReader`].
///
/// Every figure is a `SUM(quantity) ... GROUP BY equipment_type_id` over one
/// ledger table, so balances stay a pure function of the stored rows.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn sum_by_type<E>(
        &self,
        select: Select<E>,
        type_column: E::Column,
        quantity_column: E::Column,
    ) -> Result<Vec<TypeSum>, DbErr>
    where
        E: EntityTrait,
    {
        select
            .select_only()
            .column(type_column)
            .column_as(Expr::col(quantity_column).sum(), "total")
            .group_by(type_column)
            .into_model::<TypeSum>()
            .all(&self.db)
            .await
    }

    /// Sums every movement kind for one base and window.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the five aggregate queries fails.
    pub async fn movement_sums(
        &self,
        base_id: Uuid,
        window: LedgerWindow,
        equipment_type_id: Option<Uuid>,
    ) -> Result<Vec<TypeMovements>, DbErr> {
        let mut purchases_q = purchases::Entity::find()
            .filter(purchases::Column::BaseId.eq(base_id))
            .filter(dated_within(purchases::Column::PurchaseDate, window));
        let mut transfers_in_q = transfers::Entity::find()
            .filter(transfers::Column::DestinationBaseId.eq(base_id))
            .filter(transfers::Column::Status.eq(TransferStatus::Completed))
            .filter(dated_within(transfers::Column::CompletedOn, window));
        let mut transfers_out_q = transfers::Entity::find()
            .filter(transfers::Column::SourceBaseId.eq(base_id))
            .filter(transfers::Column::Status.eq(TransferStatus::Completed))
            .filter(dated_within(transfers::Column::CompletedOn, window));
        let mut assigned_q = assignments::Entity::find()
            .filter(assignments::Column::BaseId.eq(base_id))
            .filter(held_at_close(assignments::Column::AssignmentDate, window))
            .filter(
                Condition::any()
                    .add(assignments::Column::Status.eq(AssignmentStatus::Active))
                    .add(
                        Condition::all()
                            .add(assignments::Column::Status.eq(AssignmentStatus::Expended))
                            .add(after_close(assignments::Column::ExpendedOn, window)),
                    ),
            );
        let mut expended_q = assignments::Entity::find()
            .filter(assignments::Column::BaseId.eq(base_id))
            .filter(assignments::Column::Status.eq(AssignmentStatus::Expended))
            .filter(dated_within(assignments::Column::ExpendedOn, window));

        if let Some(type_id) = equipment_type_id {
            purchases_q = purchases_q.filter(purchases::Column::EquipmentTypeId.eq(type_id));
            transfers_in_q = transfers_in_q.filter(transfers::Column::EquipmentTypeId.eq(type_id));
            transfers_out_q =
                transfers_out_q.filter(transfers::Column::EquipmentTypeId.eq(type_id));
            assigned_q = assigned_q.filter(assignments::Column::EquipmentTypeId.eq(type_id));
            expended_q = expended_q.filter(assignments::Column::EquipmentTypeId.eq(type_id));
        }

        let purchased = self
            .sum_by_type(
                purchases_q,
                purchases::Column::EquipmentTypeId,
                purchases::Column::Quantity,
            )
            .await?;
        let received = self
            .sum_by_type(
                transfers_in_q,
                transfers::Column::EquipmentTypeId,
                transfers::Column::Quantity,
            )
            .await?;
        let sent = self
            .sum_by_type(
                transfers_out_q,
                transfers::Column::EquipmentTypeId,
                transfers::Column::Quantity,
            )
            .await?;
        let assigned = self
            .sum_by_type(
                assigned_q,
                assignments::Column::EquipmentTypeId,
                assignments::Column::Quantity,
            )
            .await?;
        let expended = self
            .sum_by_type(
                expended_q,
                assignments::Column::EquipmentTypeId,
                assignments::Column::Quantity,
            )
            .await?;

        let mut totals: BTreeMap<Uuid, MovementTotals> = BTreeMap::new();
        for row in purchased {
            totals.entry(row.equipment_type_id).or_default().purchases += row.total;
        }
        for row in received {
            totals.entry(row.equipment_type_id).or_default().transfers_in += row.total;
        }
        for row in sent {
            totals.entry(row.equipment_type_id).or_default().transfers_out += row.total;
        }
        for row in assigned {
            totals.entry(row.equipment_type_id).or_default().assigned += row.total;
        }
        for row in expended {
            totals.entry(row.equipment_type_id).or_default().expended += row.total;
        }

        Ok(totals
            .into_iter()
            .map(|(id, totals)| TypeMovements {
                equipment_type_id: EquipmentTypeId::from_uuid(id),
                totals,
            })
            .collect())
    }
}

#[async_trait]
impl LedgerReader for LedgerRepository {
    async fn find_base(&self, id: BaseId) -> Result<Option<BaseInfo>, LedgerReadError> {
        bases::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|base| base.map(Into::into))
            .map_err(read_error("find_base"))
    }

    async fn list_bases(&self) -> Result<Vec<BaseInfo>, LedgerReadError> {
        bases::Entity::find()
            .order_by_asc(bases::Column::Name)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(read_error("list_bases"))
    }

    async fn find_equipment_type(
        &self,
        id: EquipmentTypeId,
    ) -> Result<Option<EquipmentTypeInfo>, LedgerReadError> {
        equipment_types::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|t| t.map(Into::into))
            .map_err(read_error("find_equipment_type"))
    }

    async fn list_equipment_types(&self) -> Result<Vec<EquipmentTypeInfo>, LedgerReadError> {
        equipment_types::Entity::find()
            .order_by_asc(equipment_types::Column::Name)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(read_error("list_equipment_types"))
    }

    async fn movement_totals(
        &self,
        base_id: BaseId,
        window: LedgerWindow,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<Vec<TypeMovements>, LedgerReadError> {
        self.movement_sums(
            base_id.into_inner(),
            window,
            equipment_type_id.map(EquipmentTypeId::into_inner),
        )
        .await
        .map_err(read_error("movement_totals"))
    }
}

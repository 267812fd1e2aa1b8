//! Assignment and expenditure repository.

use chrono::{NaiveDate, Utc};
use garrison_core::ledger::NewAssignment;
use garrison_shared::types::PageRequest;
use sea_orm::sea_query::{Alias, Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::LedgerQuery;
use crate::entities::{assignments, sea_orm_active_enums::AssignmentStatus};

/// Repository for assignment records.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists assignments matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &LedgerQuery,
        status: Option<AssignmentStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<assignments::Model>, u64), DbErr> {
        let mut query = Self::filtered(filter);
        if let Some(status) = status {
            query = query.filter(assignments::Column::Status.eq(status));
        }
        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(assignments::Column::AssignmentDate)
            .order_by_desc(assignments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds an assignment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<assignments::Model>, DbErr> {
        assignments::Entity::find_by_id(id).one(&self.db).await
    }

    /// Records a validated assignment or direct expenditure.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        assignment: &NewAssignment,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<assignments::Model, DbErr> {
        let now = Utc::now().into();
        let status = AssignmentStatus::from(assignment.status);
        assignments::ActiveModel {
            id: Set(Uuid::now_v7()),
            base_id: Set(assignment.base_id.into_inner()),
            equipment_type_id: Set(assignment.equipment_type_id.into_inner()),
            quantity: Set(assignment.quantity),
            assignee: Set(assignment.assignee.trim().to_string()),
            assignment_date: Set(assignment.assignment_date),
            status: Set(status),
            expended_on: Set(
                (status == AssignmentStatus::Expended).then_some(assignment.assignment_date),
            ),
            notes: Set(notes.map(ToString::to_string)),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Moves an assignment from `from` to `to` if it is still in `from`.
    ///
    /// A move to `expended` records `effective_on` as the expenditure date.
    /// Returns `None` when the row was missing or had already moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: AssignmentStatus,
        to: AssignmentStatus,
        effective_on: NaiveDate,
    ) -> Result<Option<assignments::Model>, DbErr> {
        let mut update = assignments::Entity::update_many().col_expr(
            assignments::Column::Status,
            Expr::value(to).as_enum(Alias::new("assignment_status")),
        );
        if to == AssignmentStatus::Expended {
            update = update.col_expr(assignments::Column::ExpendedOn, Expr::value(effective_on));
        }

        let result = update
            .filter(assignments::Column::Id.eq(id))
            .filter(assignments::Column::Status.eq(from))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    fn filtered(filter: &LedgerQuery) -> Select<assignments::Entity> {
        let mut query = assignments::Entity::find();
        if let Some(base_id) = filter.base_id {
            query = query.filter(assignments::Column::BaseId.eq(base_id));
        }
        if let Some(equipment_type_id) = filter.equipment_type_id {
            query = query.filter(assignments::Column::EquipmentTypeId.eq(equipment_type_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(assignments::Column::AssignmentDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(assignments::Column::AssignmentDate.lte(end));
        }
        query
    }
}

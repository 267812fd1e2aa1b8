//! Assignment and expenditure routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use chrono::{NaiveDate, Utc};
use garrison_core::access::{AccessGate, Action};
use garrison_core::ledger::{
    AssignmentStatus, NewAssignment, validate_assignment, validate_assignment_transition,
    validate_effective_date,
};
use garrison_db::{AssignmentRepository, entities::assignments};
use garrison_shared::types::{BaseId, EquipmentTypeId, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
    routes::{
        LedgerListQuery, authorize, authorize_role, ensure_active_base, ensure_equipment_type,
    },
};

/// Creates the assignment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route(
            "/assignments/{assignment_id}/status",
            patch(update_assignment_status),
        )
}

/// Request body for assigning or expending equipment.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    /// Base the equipment is drawn from. Non-admins default to their home base.
    pub base_id: Option<Uuid>,
    /// Equipment type drawn.
    pub equipment_type_id: Uuid,
    /// Units drawn.
    pub quantity: i32,
    /// Person or unit receiving the equipment.
    pub assignee: String,
    /// Date of the assignment.
    pub assignment_date: NaiveDate,
    /// `active` (default) or `expended` for direct expenditure.
    pub status: Option<AssignmentStatus>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentStatusRequest {
    /// Target status.
    pub status: AssignmentStatus,
    /// Day the expenditure takes effect. Defaults to today.
    pub effective_date: Option<NaiveDate>,
}

/// GET /assignments - List assignments, newest first.
async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<LedgerListQuery>,
) -> Result<Json<PageResponse<assignments::Model>>, ApiError> {
    let (filter, page) = query.authorize(&auth, Action::ViewAssignments)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<AssignmentStatus>)
        .transpose()?;

    let (rows, total) = AssignmentRepository::new((*state.db).clone())
        .list(&filter, status.map(Into::into), &page)
        .await?;
    Ok(Json(PageResponse::new(rows, &page, total)))
}

/// POST /assignments - Assign equipment, or record a direct expenditure.
async fn create_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<assignments::Model>), ApiError> {
    let base_id = AccessGate::effective_base(auth.principal(), payload.base_id.map(BaseId::from_uuid))
        .ok_or_else(|| ApiError::invalid("base_id is required"))?;
    authorize(&auth, Action::RecordAssignment, Some(base_id))?;

    let assignment = NewAssignment {
        base_id,
        equipment_type_id: EquipmentTypeId::from_uuid(payload.equipment_type_id),
        quantity: payload.quantity,
        assignee: payload.assignee,
        assignment_date: payload.assignment_date,
        status: payload.status.unwrap_or(AssignmentStatus::Active),
    };
    validate_assignment(&assignment)?;

    ensure_active_base(&state, assignment.base_id).await?;
    ensure_equipment_type(&state, assignment.equipment_type_id).await?;

    let record = AssignmentRepository::new((*state.db).clone())
        .create(&assignment, payload.notes.as_deref(), auth.user_id())
        .await?;

    info!(
        assignment_id = %record.id,
        base_id = %record.base_id,
        quantity = record.quantity,
        status = %assignment.status,
        created_by = %auth.user_id(),
        "Assignment recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH `/assignments/{assignment_id}/status` - Return or expend an active assignment.
async fn update_assignment_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(assignment_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateAssignmentStatusRequest>,
) -> Result<Json<assignments::Model>, ApiError> {
    authorize_role(&auth, Action::UpdateAssignmentStatus)?;

    let repo = AssignmentRepository::new((*state.db).clone());
    let current = repo
        .find_by_id(assignment_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("assignment {assignment_id}")))?;

    authorize(
        &auth,
        Action::UpdateAssignmentStatus,
        Some(BaseId::from_uuid(current.base_id)),
    )?;

    let from = AssignmentStatus::from(current.status);
    let to = payload.status;
    validate_assignment_transition(from, to)?;
    let effective_on = payload
        .effective_date
        .unwrap_or_else(|| Utc::now().date_naive());
    if to == AssignmentStatus::Expended {
        validate_effective_date(current.assignment_date, effective_on)?;
    }

    let updated = repo
        .update_status(assignment_id, from.into(), to.into(), effective_on)
        .await?
        .ok_or_else(|| {
            ApiError::conflict(format!("assignment {assignment_id} changed concurrently"))
        })?;

    info!(
        assignment_id = %updated.id,
        from = %from,
        to = %to,
        expended_on = ?updated.expended_on,
        updated_by = %auth.user_id(),
        "Assignment status changed"
    );
    Ok(Json(updated))
}

//! Transfer ledger routes.
//!
//! A transfer belongs to its source base: recording it and moving it along
//! its lifecycle are scoped there. Listing matches either side.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use chrono::{NaiveDate, Utc};
use garrison_core::access::{AccessGate, Action};
use garrison_core::ledger::{
    NewTransfer, TransferStatus, validate_effective_date, validate_transfer,
    validate_transfer_transition,
};
use garrison_db::{TransferRepository, entities::transfers};
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

/// Creates the transfer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route("/transfers/{transfer_id}/status", patch(update_transfer_status))
}

/// Request body for recording a transfer.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// Sending base. Non-admins default to their home base.
    pub source_base_id: Option<Uuid>,
    /// Receiving base.
    pub destination_base_id: Uuid,
    /// Equipment type moved.
    pub equipment_type_id: Uuid,
    /// Units moved.
    pub quantity: i32,
    /// Date of the transfer.
    pub transfer_date: NaiveDate,
    /// Initial status, `pending` when omitted.
    pub status: Option<TransferStatus>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateTransferStatusRequest {
    /// Target status.
    pub status: TransferStatus,
    /// Day the completion takes effect. Defaults to today.
    pub effective_date: Option<NaiveDate>,
}

/// GET /transfers - List transfers touching a base, newest first.
async fn list_transfers(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<LedgerListQuery>,
) -> Result<Json<PageResponse<transfers::Model>>, ApiError> {
    let (filter, page) = query.authorize(&auth, Action::ViewTransfers)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<TransferStatus>)
        .transpose()?;

    let (rows, total) = TransferRepository::new((*state.db).clone())
        .list(&filter, status.map(Into::into), &page)
        .await?;
    Ok(Json(PageResponse::new(rows, &page, total)))
}

/// POST /transfers - Record a transfer out of a base.
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateTransferRequest>,
) -> Result<(StatusCode, Json<transfers::Model>), ApiError> {
    let source_base_id = AccessGate::effective_base(
        auth.principal(),
        payload.source_base_id.map(BaseId::from_uuid),
    )
    .ok_or_else(|| ApiError::invalid("source_base_id is required"))?;
    authorize(&auth, Action::RecordTransfer, Some(source_base_id))?;

    let transfer = NewTransfer {
        source_base_id,
        destination_base_id: BaseId::from_uuid(payload.destination_base_id),
        equipment_type_id: EquipmentTypeId::from_uuid(payload.equipment_type_id),
        quantity: payload.quantity,
        transfer_date: payload.transfer_date,
        status: payload.status.unwrap_or(TransferStatus::Pending),
    };
    validate_transfer(&transfer)?;

    ensure_active_base(&state, transfer.source_base_id).await?;
    ensure_active_base(&state, transfer.destination_base_id).await?;
    ensure_equipment_type(&state, transfer.equipment_type_id).await?;

    let record = TransferRepository::new((*state.db).clone())
        .create(&transfer, payload.notes.as_deref(), auth.user_id())
        .await?;

    info!(
        transfer_id = %record.id,
        source_base_id = %record.source_base_id,
        destination_base_id = %record.destination_base_id,
        quantity = record.quantity,
        status = %transfer.status,
        created_by = %auth.user_id(),
        "Transfer recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH `/transfers/{transfer_id}/status` - Move a transfer along its lifecycle.
async fn update_transfer_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(transfer_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateTransferStatusRequest>,
) -> Result<Json<transfers::Model>, ApiError> {
    authorize_role(&auth, Action::UpdateTransferStatus)?;

    let repo = TransferRepository::new((*state.db).clone());
    let current = repo
        .find_by_id(transfer_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("transfer {transfer_id}")))?;

    authorize(
        &auth,
        Action::UpdateTransferStatus,
        Some(BaseId::from_uuid(current.source_base_id)),
    )?;

    let from = TransferStatus::from(current.status);
    let to = payload.status;
    validate_transfer_transition(from, to)?;
    let effective_on = payload
        .effective_date
        .unwrap_or_else(|| Utc::now().date_naive());
    if to.affects_balance() {
        validate_effective_date(current.transfer_date, effective_on)?;
    }

    let updated = repo
        .update_status(transfer_id, from.into(), to.into(), effective_on)
        .await?
        .ok_or_else(|| ApiError::conflict(format!("transfer {transfer_id} changed concurrently")))?;

    info!(
        transfer_id = %updated.id,
        from = %from,
        to = %to,
        completed_on = ?updated.completed_on,
        updated_by = %auth.user_id(),
        "Transfer status changed"
    );
    Ok(Json(updated))
}

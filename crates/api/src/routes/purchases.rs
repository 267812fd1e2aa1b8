//! Purchase ledger routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use garrison_core::access::{AccessGate, Action};
use garrison_core::ledger::{NewPurchase, validate_purchase};
use garrison_db::{PurchaseRepository, entities::purchases};
use garrison_shared::types::{BaseId, EquipmentTypeId, PageResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
    routes::{LedgerListQuery, authorize, ensure_active_base, ensure_equipment_type},
};

/// Creates the purchase routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/purchases", get(list_purchases).post(create_purchase))
}

/// Request body for recording a purchase.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    /// Receiving base. Non-admins default to their home base.
    pub base_id: Option<Uuid>,
    /// Equipment type bought.
    pub equipment_type_id: Uuid,
    /// Units bought.
    pub quantity: i32,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Date of purchase.
    pub purchase_date: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// GET /purchases - List purchases, newest first.
async fn list_purchases(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<LedgerListQuery>,
) -> Result<Json<PageResponse<purchases::Model>>, ApiError> {
    let (filter, page) = query.authorize(&auth, Action::ViewPurchases)?;

    let (rows, total) = PurchaseRepository::new((*state.db).clone())
        .list(&filter, &page)
        .await?;
    Ok(Json(PageResponse::new(rows, &page, total)))
}

/// POST /purchases - Record a purchase.
async fn create_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<purchases::Model>), ApiError> {
    let base_id = AccessGate::effective_base(auth.principal(), payload.base_id.map(BaseId::from_uuid))
        .ok_or_else(|| ApiError::invalid("base_id is required"))?;
    authorize(&auth, Action::RecordPurchase, Some(base_id))?;

    let purchase = NewPurchase {
        base_id,
        equipment_type_id: EquipmentTypeId::from_uuid(payload.equipment_type_id),
        quantity: payload.quantity,
        unit_cost: payload.unit_cost,
        purchase_date: payload.purchase_date,
    };
    let total_cost = validate_purchase(&purchase)?;

    ensure_active_base(&state, purchase.base_id).await?;
    ensure_equipment_type(&state, purchase.equipment_type_id).await?;

    let record = PurchaseRepository::new((*state.db).clone())
        .create(&purchase, total_cost, payload.notes.as_deref(), auth.user_id())
        .await?;

    info!(
        purchase_id = %record.id,
        base_id = %record.base_id,
        equipment_type_id = %record.equipment_type_id,
        quantity = record.quantity,
        created_by = %auth.user_id(),
        "Purchase recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

//! Equipment type catalogue routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use garrison_core::access::Action;
use garrison_core::ledger::EquipmentCategory;
use garrison_db::{EquipmentTypeRepository, entities::equipment_types};
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, extractors::ApiJson, middleware::AuthUser, routes::authorize};

/// Creates the equipment type routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/equipment-types",
        get(list_equipment_types).post(create_equipment_type),
    )
}

/// Request body for creating an equipment type.
#[derive(Debug, Deserialize)]
pub struct CreateEquipmentTypeRequest {
    /// Unique display name.
    pub name: String,
    /// Category.
    pub category: EquipmentCategory,
    /// Optional description.
    pub description: Option<String>,
}

/// GET /equipment-types - List equipment types by name.
async fn list_equipment_types(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<equipment_types::Model>>, ApiError> {
    authorize(&auth, Action::ViewReferenceData, None)?;

    let rows = EquipmentTypeRepository::new((*state.db).clone())
        .list()
        .await?;
    Ok(Json(rows))
}

/// POST /equipment-types - Add an equipment type.
async fn create_equipment_type(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateEquipmentTypeRequest>,
) -> Result<(StatusCode, Json<equipment_types::Model>), ApiError> {
    authorize(&auth, Action::ManageEquipmentTypes, None)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid("equipment type name cannot be empty"));
    }

    let equipment_type = EquipmentTypeRepository::new((*state.db).clone())
        .create(name, payload.category.into(), payload.description.as_deref())
        .await?;

    info!(
        equipment_type_id = %equipment_type.id,
        name = %equipment_type.name,
        created_by = %auth.user_id(),
        "Equipment type created"
    );
    Ok((StatusCode::CREATED, Json(equipment_type)))
}

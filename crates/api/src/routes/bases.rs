//! Base management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use garrison_core::access::Action;
use garrison_db::{BaseRepository, entities::bases};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
    routes::authorize,
};

/// Creates the base routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bases", get(list_bases).post(create_base))
        .route("/bases/{base_id}/deactivate", post(deactivate_base))
}

/// Query parameters for listing bases.
#[derive(Debug, Default, Deserialize)]
pub struct ListBasesQuery {
    /// Include deactivated bases. Only honoured for admins.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a base.
#[derive(Debug, Deserialize)]
pub struct CreateBaseRequest {
    /// Unique display name.
    pub name: String,
    /// Free-form location.
    pub location: String,
}

/// GET /bases - List bases by name.
async fn list_bases(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListBasesQuery>,
) -> Result<Json<Vec<bases::Model>>, ApiError> {
    authorize(&auth, Action::ViewReferenceData, None)?;

    let include_inactive = query.include_inactive && auth.0.is_admin();
    let rows = BaseRepository::new((*state.db).clone())
        .list(include_inactive)
        .await?;
    Ok(Json(rows))
}

/// POST /bases - Create a base.
async fn create_base(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateBaseRequest>,
) -> Result<(StatusCode, Json<bases::Model>), ApiError> {
    authorize(&auth, Action::ManageBases, None)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid("base name cannot be empty"));
    }

    let base = BaseRepository::new((*state.db).clone())
        .create(name, payload.location.trim())
        .await?;

    info!(base_id = %base.id, name = %base.name, created_by = %auth.user_id(), "Base created");
    Ok((StatusCode::CREATED, Json(base)))
}

/// POST `/bases/{base_id}/deactivate` - Deactivate a base.
///
/// Records stay in place. Deactivating twice is not an error.
async fn deactivate_base(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(base_id): ApiPath<Uuid>,
) -> Result<Json<bases::Model>, ApiError> {
    authorize(&auth, Action::ManageBases, None)?;

    let base = BaseRepository::new((*state.db).clone())
        .deactivate(base_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("base {base_id}")))?;

    info!(base_id = %base.id, deactivated_by = %auth.user_id(), "Base deactivated");
    Ok(Json(base))
}

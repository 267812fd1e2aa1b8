//! API route definitions.

use axum::{Router, middleware};
use chrono::NaiveDate;
use garrison_core::access::{AccessGate, Action};
use garrison_core::balance::{BaseInfo, EquipmentTypeInfo};
use garrison_db::LedgerQuery;
use garrison_shared::types::{BaseId, EquipmentTypeId, PageRequest};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
};

pub mod assignments;
pub mod auth;
pub mod bases;
pub mod dashboard;
pub mod equipment_types;
pub mod health;
pub mod purchases;
pub mod transfers;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(dashboard::routes())
        .merge(bases::routes())
        .merge(equipment_types::routes())
        .merge(purchases::routes())
        .merge(transfers::routes())
        .merge(assignments::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Runs the access gate, logging denials.
pub(crate) fn authorize(
    auth: &AuthUser,
    action: Action,
    target_base_id: Option<BaseId>,
) -> Result<(), ApiError> {
    AccessGate::require(auth.principal(), action, target_base_id).map_err(|e| {
        warn!(
            user_id = %auth.0.user_id,
            role = %auth.0.role,
            action = %action,
            target_base_id = ?target_base_id,
            reason = %e.reason(),
            "Access denied"
        );
        ApiError::from(e)
    })
}

/// Checks only the role `action` needs.
///
/// Used before loading a record whose base decides the scoped check, so
/// under-privileged callers never reach storage.
pub(crate) fn authorize_role(auth: &AuthUser, action: Action) -> Result<(), ApiError> {
    AccessGate::authorize_role(auth.principal(), action.required_role(), None)
        .into_result()
        .map_err(|e| {
            warn!(
                user_id = %auth.0.user_id,
                role = %auth.0.role,
                action = %action,
                reason = %e.reason(),
                "Access denied"
            );
            ApiError::from(e)
        })
}

/// Loads a base that new records may reference.
pub(crate) async fn ensure_active_base(
    state: &AppState,
    base_id: BaseId,
) -> Result<BaseInfo, ApiError> {
    let base = state
        .ledger
        .find_base(base_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("base {base_id}")))?;

    if !base.is_active {
        return Err(ApiError::invalid(format!("base {base_id} is inactive")));
    }
    Ok(base)
}

/// Loads an equipment type that new records may reference.
pub(crate) async fn ensure_equipment_type(
    state: &AppState,
    equipment_type_id: EquipmentTypeId,
) -> Result<EquipmentTypeInfo, ApiError> {
    state
        .ledger
        .find_equipment_type(equipment_type_id)
        .await?
        .ok_or_else(|| ApiError::invalid(format!("unknown equipment type: {equipment_type_id}")))
}

/// Query parameters shared by the ledger list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerListQuery {
    /// Base filter. Non-admins default to their home base.
    pub base_id: Option<Uuid>,
    /// Equipment type filter.
    pub equipment_type_id: Option<Uuid>,
    /// Earliest record date, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Latest record date, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Status filter, where the record has one.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl LedgerListQuery {
    /// Resolves the base to list for `auth`, checks the gate, and builds the
    /// repository filter.
    pub(crate) fn authorize(
        &self,
        auth: &AuthUser,
        action: Action,
    ) -> Result<(LedgerQuery, PageRequest), ApiError> {
        let target = AccessGate::effective_base(auth.principal(), self.base_id.map(BaseId::from_uuid));
        authorize(auth, action, target)?;

        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(ApiError::invalid(format!(
                "start date {start} is after end date {end}"
            )));
        }

        let filter = LedgerQuery {
            base_id: target.map(BaseId::into_inner),
            equipment_type_id: self.equipment_type_id,
            start_date: self.start_date,
            end_date: self.end_date,
        };
        Ok((filter, PageRequest::from_query(self.page, self.per_page)))
    }
}

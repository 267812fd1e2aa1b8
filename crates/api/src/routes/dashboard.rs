//! Dashboard routes: balance metrics per base.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use garrison_core::access::{AccessGate, Action};
use garrison_core::balance::{BalanceEngine, DateRange, MetricsReport, MetricsResult, TypeMetrics};
use garrison_shared::types::{BaseId, EquipmentTypeId};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::ApiQuery, middleware::AuthUser, routes::authorize};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/metrics", get(get_metrics))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for balance metrics.
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    /// Base to report. Non-admins default to their home base; admins
    /// without it get every active base.
    pub base_id: Option<Uuid>,
    /// First day of the range, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the range, `YYYY-MM-DD`.
    pub end_date: String,
    /// Restrict figures to one equipment type.
    pub equipment_type_id: Option<Uuid>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Balance figures as sent over the wire.
#[derive(Debug, Serialize)]
pub struct MetricsFigures {
    /// Balance before the range.
    pub opening_balance: i64,
    /// Balance at the end of the range.
    pub closing_balance: i64,
    /// Units purchased.
    pub purchases: i64,
    /// Units received.
    pub transfers_in: i64,
    /// Units sent.
    pub transfers_out: i64,
    /// Units on active assignment at range end.
    pub assigned: i64,
    /// Units expended.
    pub expended: i64,
    /// Purchases plus transfers in minus transfers out.
    pub net_movement: i64,
    /// Percent change from opening to closing.
    pub percent_change: f64,
}

impl From<&MetricsResult> for MetricsFigures {
    fn from(m: &MetricsResult) -> Self {
        Self {
            opening_balance: m.opening_balance,
            closing_balance: m.closing_balance,
            purchases: m.purchases,
            transfers_in: m.transfers_in,
            transfers_out: m.transfers_out,
            assigned: m.assigned,
            expended: m.expended,
            net_movement: m.net_movement,
            percent_change: m.percent_change.to_f64().unwrap_or_default(),
        }
    }
}

/// Figures for one equipment type.
#[derive(Debug, Serialize)]
pub struct TypeMetricsResponse {
    /// Equipment type ID.
    pub equipment_type_id: Uuid,
    /// Equipment type name.
    pub equipment_type_name: Option<String>,
    /// Figures.
    #[serde(flatten)]
    pub figures: MetricsFigures,
}

impl From<&TypeMetrics> for TypeMetricsResponse {
    fn from(t: &TypeMetrics) -> Self {
        Self {
            equipment_type_id: t.equipment_type_id.into_inner(),
            equipment_type_name: t.equipment_type_name.clone(),
            figures: MetricsFigures::from(&t.metrics),
        }
    }
}

/// Metrics for one base over one range.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// Base ID.
    pub base_id: Uuid,
    /// Base name.
    pub base_name: String,
    /// First day of the range.
    pub start_date: NaiveDate,
    /// Last day of the range.
    pub end_date: NaiveDate,
    /// Equipment type filter, if one was applied.
    pub equipment_type_id: Option<Uuid>,
    /// Figures across the reported types.
    #[serde(flatten)]
    pub figures: MetricsFigures,
    /// Per-type figures.
    pub by_equipment_type: Vec<TypeMetricsResponse>,
}

impl From<&MetricsReport> for MetricsResponse {
    fn from(report: &MetricsReport) -> Self {
        Self {
            base_id: report.base.id.into_inner(),
            base_name: report.base.name.clone(),
            start_date: report.range.start(),
            end_date: report.range.end(),
            equipment_type_id: report.equipment_type_filter.map(EquipmentTypeId::into_inner),
            figures: MetricsFigures::from(&report.totals),
            by_equipment_type: report
                .by_equipment_type
                .iter()
                .map(TypeMetricsResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /dashboard/metrics - Opening, closing and movement figures.
///
/// Returns one object for a single base, or an array when an admin asks for
/// every base.
async fn get_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<MetricsQuery>,
) -> Result<Response, ApiError> {
    let target = AccessGate::effective_base(auth.principal(), query.base_id.map(BaseId::from_uuid));
    authorize(&auth, Action::ViewDashboard, target)?;

    let range = DateRange::parse(&query.start_date, &query.end_date)?;
    let equipment_type_id = query.equipment_type_id.map(EquipmentTypeId::from_uuid);
    let engine = BalanceEngine::new(state.ledger.as_ref());

    match target {
        Some(base_id) => {
            let report = engine
                .compute_metrics(base_id, range, equipment_type_id)
                .await?;
            debug!(base_id = %base_id, closing = report.totals.closing_balance, "Computed metrics");
            Ok(Json(MetricsResponse::from(&report)).into_response())
        }
        None => {
            let reports = engine
                .compute_metrics_for_active_bases(range, equipment_type_id)
                .await?;
            debug!(bases = reports.len(), "Computed metrics for all bases");
            let body: Vec<MetricsResponse> = reports.iter().map(MetricsResponse::from).collect();
            Ok(Json(body).into_response())
        }
    }
}

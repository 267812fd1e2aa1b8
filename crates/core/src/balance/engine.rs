//! Balance computation.

use std::collections::HashMap;

use garrison_shared::types::{BaseId, EquipmentTypeId};

use super::error::BalanceError;
use super::reader::LedgerReader;
use super::types::{
    BaseInfo, DateRange, EquipmentTypeInfo, LedgerWindow, MetricsReport, MetricsResult,
    MovementTotals, TypeMetrics, TypeMovements,
};

/// Computes balance metrics over a [`LedgerReader`].
///
/// The engine is read-only and holds no state besides the reader, so the
/// same inputs over an unchanged ledger always give the same report.
/// Authorization is the caller's job.
#[derive(Clone, Copy)]
pub struct BalanceEngine<'a> {
    ledger: &'a dyn LedgerReader,
}

impl<'a> BalanceEngine<'a> {
    /// Creates an engine reading from `ledger`.
    #[must_use]
    pub const fn new(ledger: &'a dyn LedgerReader) -> Self {
        Self { ledger }
    }

    /// Computes metrics for one base.
    ///
    /// With an equipment type filter only that type is reported. Without
    /// one every known type is reported, types with no movements as zeros.
    ///
    /// # Errors
    ///
    /// - `BaseNotFound` if the base does not exist
    /// - `BaseInactive` if the base was deactivated
    /// - `UnknownEquipmentType` if the filter matches no type
    /// - `LedgerUnavailable` if any read fails
    pub async fn compute_metrics(
        &self,
        base_id: BaseId,
        range: DateRange,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<MetricsReport, BalanceError> {
        let base = self
            .ledger
            .find_base(base_id)
            .await?
            .ok_or(BalanceError::BaseNotFound(base_id))?;

        if !base.is_active {
            return Err(BalanceError::BaseInactive(base_id));
        }

        let types = self.resolve_types(equipment_type_id).await?;
        self.compute_for_base(base, &types, range, equipment_type_id)
            .await
    }

    /// Computes metrics for every active base, ordered by base name.
    ///
    /// # Errors
    ///
    /// - `UnknownEquipmentType` if the filter matches no type
    /// - `LedgerUnavailable` if any read fails
    pub async fn compute_metrics_for_active_bases(
        &self,
        range: DateRange,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<Vec<MetricsReport>, BalanceError> {
        let types = self.resolve_types(equipment_type_id).await?;
        let bases = self.ledger.list_bases().await?;

        let mut reports = Vec::new();
        for base in bases.into_iter().filter(|b| b.is_active) {
            reports.push(
                self.compute_for_base(base, &types, range, equipment_type_id)
                    .await?,
            );
        }
        Ok(reports)
    }

    async fn resolve_types(
        &self,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<Vec<EquipmentTypeInfo>, BalanceError> {
        match equipment_type_id {
            Some(id) => {
                let equipment_type = self
                    .ledger
                    .find_equipment_type(id)
                    .await?
                    .ok_or(BalanceError::UnknownEquipmentType(id))?;
                Ok(vec![equipment_type])
            }
            None => Ok(self.ledger.list_equipment_types().await?),
        }
    }

    async fn compute_for_base(
        &self,
        base: BaseInfo,
        types: &[EquipmentTypeInfo],
        range: DateRange,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<MetricsReport, BalanceError> {
        let opening = self
            .ledger
            .movement_totals(base.id, LedgerWindow::Before(range.start()), equipment_type_id)
            .await?;
        let period = self
            .ledger
            .movement_totals(base.id, LedgerWindow::Within(range), equipment_type_id)
            .await?;

        let (totals, by_equipment_type) =
            aggregate_movements(types, &opening, &period, equipment_type_id);

        Ok(MetricsReport {
            base,
            range,
            equipment_type_filter: equipment_type_id,
            totals,
            by_equipment_type,
        })
    }
}

struct TypeRow {
    id: EquipmentTypeId,
    name: Option<String>,
    opening: MovementTotals,
    period: MovementTotals,
}

/// Folds per-type movement rows into per-type metrics and their aggregate.
///
/// Every listed type gets a row. Movements for a type that is not listed
/// still count, under a row without a name. When `filter` is set, rows for
/// other types are ignored. The aggregate is computed from summed movements,
/// so its percent change is not an average of per-type percentages.
#[must_use]
pub fn aggregate_movements(
    types: &[EquipmentTypeInfo],
    opening: &[TypeMovements],
    period: &[TypeMovements],
    filter: Option<EquipmentTypeId>,
) -> (MetricsResult, Vec<TypeMetrics>) {
    let mut rows: Vec<TypeRow> = types
        .iter()
        .filter(|t| filter.is_none_or(|f| f == t.id))
        .map(|t| TypeRow {
            id: t.id,
            name: Some(t.name.clone()),
            opening: MovementTotals::default(),
            period: MovementTotals::default(),
        })
        .collect();
    let mut index: HashMap<EquipmentTypeId, usize> =
        rows.iter().enumerate().map(|(i, row)| (row.id, i)).collect();

    let tagged = opening
        .iter()
        .map(|m| (m, true))
        .chain(period.iter().map(|m| (m, false)));

    for (movement, is_opening) in tagged {
        if filter.is_some_and(|f| f != movement.equipment_type_id) {
            continue;
        }
        let i = *index.entry(movement.equipment_type_id).or_insert_with(|| {
            rows.push(TypeRow {
                id: movement.equipment_type_id,
                name: None,
                opening: MovementTotals::default(),
                period: MovementTotals::default(),
            });
            rows.len() - 1
        });
        if is_opening {
            rows[i].opening += movement.totals;
        } else {
            rows[i].period += movement.totals;
        }
    }

    let opening_total: MovementTotals = rows.iter().map(|r| r.opening).sum();
    let period_total: MovementTotals = rows.iter().map(|r| r.period).sum();
    let totals = MetricsResult::from_movements(&opening_total, &period_total);

    let by_type = rows
        .into_iter()
        .map(|row| TypeMetrics {
            equipment_type_id: row.id,
            equipment_type_name: row.name,
            metrics: MetricsResult::from_movements(&row.opening, &row.period),
        })
        .collect();

    (totals, by_type)
}

//! In-memory ledger.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use garrison_shared::types::{BaseId, EquipmentTypeId};

use super::reader::{LedgerReadError, LedgerReader};
use super::types::{BaseInfo, EquipmentTypeInfo, LedgerWindow, MovementTotals, TypeMovements};
use crate::ledger::{AssignmentStatus, EquipmentCategory, TransferStatus};

#[derive(Debug)]
struct PurchaseRow {
    base_id: BaseId,
    equipment_type_id: EquipmentTypeId,
    quantity: i64,
    date: NaiveDate,
}

#[derive(Debug)]
struct TransferRow {
    source_base_id: BaseId,
    destination_base_id: BaseId,
    equipment_type_id: EquipmentTypeId,
    quantity: i64,
    date: NaiveDate,
    status: TransferStatus,
    completed_on: Option<NaiveDate>,
}

#[derive(Debug)]
struct AssignmentRow {
    base_id: BaseId,
    equipment_type_id: EquipmentTypeId,
    quantity: i64,
    date: NaiveDate,
    status: AssignmentStatus,
    expended_on: Option<NaiveDate>,
}

/// A [`LedgerReader`] over rows held in memory.
///
/// Built once with the chaining methods and then read concurrently. Used by
/// tests and by the API test harness in place of PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    bases: Vec<BaseInfo>,
    equipment_types: Vec<EquipmentTypeInfo>,
    purchases: Vec<PurchaseRow>,
    transfers: Vec<TransferRow>,
    assignments: Vec<AssignmentRow>,
    failure: Option<String>,
    reads: AtomicUsize,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a base.
    #[must_use]
    pub fn with_base(mut self, id: BaseId, name: &str, is_active: bool) -> Self {
        self.bases.push(BaseInfo {
            id,
            name: name.to_string(),
            location: String::new(),
            is_active,
        });
        self
    }

    /// Adds an equipment type.
    #[must_use]
    pub fn with_equipment_type(
        mut self,
        id: EquipmentTypeId,
        name: &str,
        category: EquipmentCategory,
    ) -> Self {
        self.equipment_types.push(EquipmentTypeInfo {
            id,
            name: name.to_string(),
            category,
        });
        self
    }

    /// Records a purchase.
    #[must_use]
    pub fn purchase(
        mut self,
        base_id: BaseId,
        equipment_type_id: EquipmentTypeId,
        quantity: i64,
        date: NaiveDate,
    ) -> Self {
        self.purchases.push(PurchaseRow {
            base_id,
            equipment_type_id,
            quantity,
            date,
        });
        self
    }

    /// Records a transfer. One recorded as completed completes on `date`.
    #[must_use]
    pub fn transfer(
        mut self,
        source_base_id: BaseId,
        destination_base_id: BaseId,
        equipment_type_id: EquipmentTypeId,
        quantity: i64,
        date: NaiveDate,
        status: TransferStatus,
    ) -> Self {
        self.transfers.push(TransferRow {
            source_base_id,
            destination_base_id,
            equipment_type_id,
            quantity,
            date,
            status,
            completed_on: (status == TransferStatus::Completed).then_some(date),
        });
        self
    }

    /// Records a transfer dated `date` that was later completed on
    /// `completed_on`.
    #[must_use]
    pub fn transfer_completed_on(
        mut self,
        source_base_id: BaseId,
        destination_base_id: BaseId,
        equipment_type_id: EquipmentTypeId,
        quantity: i64,
        date: NaiveDate,
        completed_on: NaiveDate,
    ) -> Self {
        self.transfers.push(TransferRow {
            source_base_id,
            destination_base_id,
            equipment_type_id,
            quantity,
            date,
            status: TransferStatus::Completed,
            completed_on: Some(completed_on),
        });
        self
    }

    /// Records an assignment or direct expenditure.
    #[must_use]
    pub fn assignment(
        mut self,
        base_id: BaseId,
        equipment_type_id: EquipmentTypeId,
        quantity: i64,
        date: NaiveDate,
        status: AssignmentStatus,
    ) -> Self {
        self.assignments.push(AssignmentRow {
            base_id,
            equipment_type_id,
            quantity,
            date,
            status,
            expended_on: (status == AssignmentStatus::Expended).then_some(date),
        });
        self
    }

    /// Records an assignment dated `date` that was expended on `expended_on`.
    #[must_use]
    pub fn assignment_expended_on(
        mut self,
        base_id: BaseId,
        equipment_type_id: EquipmentTypeId,
        quantity: i64,
        date: NaiveDate,
        expended_on: NaiveDate,
    ) -> Self {
        self.assignments.push(AssignmentRow {
            base_id,
            equipment_type_id,
            quantity,
            date,
            status: AssignmentStatus::Expended,
            expended_on: Some(expended_on),
        });
        self
    }

    /// Makes every subsequent read fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Number of reads served so far, failed ones included.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn begin_read(&self) -> Result<(), LedgerReadError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        match &self.failure {
            Some(message) => Err(LedgerReadError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn find_base(&self, id: BaseId) -> Result<Option<BaseInfo>, LedgerReadError> {
        self.begin_read()?;
        Ok(self.bases.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bases(&self) -> Result<Vec<BaseInfo>, LedgerReadError> {
        self.begin_read()?;
        let mut bases = self.bases.clone();
        bases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(bases)
    }

    async fn find_equipment_type(
        &self,
        id: EquipmentTypeId,
    ) -> Result<Option<EquipmentTypeInfo>, LedgerReadError> {
        self.begin_read()?;
        Ok(self.equipment_types.iter().find(|t| t.id == id).cloned())
    }

    async fn list_equipment_types(&self) -> Result<Vec<EquipmentTypeInfo>, LedgerReadError> {
        self.begin_read()?;
        let mut types = self.equipment_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn movement_totals(
        &self,
        base_id: BaseId,
        window: LedgerWindow,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<Vec<TypeMovements>, LedgerReadError> {
        self.begin_read()?;

        let wanted = |id: EquipmentTypeId| equipment_type_id.is_none_or(|f| f == id);
        let mut sums: BTreeMap<EquipmentTypeId, MovementTotals> = BTreeMap::new();

        for p in &self.purchases {
            if p.base_id == base_id && wanted(p.equipment_type_id) && window.contains(p.date) {
                sums.entry(p.equipment_type_id).or_default().purchases += p.quantity;
            }
        }

        for t in &self.transfers {
            let completed_in_window = t.completed_on.is_some_and(|d| window.contains(d));
            if !t.status.affects_balance() || !wanted(t.equipment_type_id) || !completed_in_window
            {
                continue;
            }
            if t.destination_base_id == base_id {
                sums.entry(t.equipment_type_id).or_default().transfers_in += t.quantity;
            }
            if t.source_base_id == base_id {
                sums.entry(t.equipment_type_id).or_default().transfers_out += t.quantity;
            }
        }

        for a in &self.assignments {
            if a.base_id != base_id || !wanted(a.equipment_type_id) {
                continue;
            }
            match (a.status, a.expended_on) {
                (AssignmentStatus::Active, _) if window.holds_assignment(a.date) => {
                    sums.entry(a.equipment_type_id).or_default().assigned += a.quantity;
                }
                (AssignmentStatus::Expended, Some(on)) if window.contains(on) => {
                    sums.entry(a.equipment_type_id).or_default().expended += a.quantity;
                }
                // Still out on assignment when the window closed
                (AssignmentStatus::Expended, Some(on))
                    if window.holds_assignment(a.date) && window.is_after_close(on) =>
                {
                    sums.entry(a.equipment_type_id).or_default().assigned += a.quantity;
                }
                _ => {}
            }
        }

        Ok(sums
            .into_iter()
            .map(|(equipment_type_id, totals)| TypeMovements {
                equipment_type_id,
                totals,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::DateRange;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_movement_totals_respect_window() {
        let base = BaseId::new();
        let other = BaseId::new();
        let kind = EquipmentTypeId::new();
        let ledger = InMemoryLedger::new()
            .purchase(base, kind, 10, date(1))
            .purchase(base, kind, 5, date(10))
            .purchase(other, kind, 99, date(10))
            .transfer(base, other, kind, 2, date(10), TransferStatus::Completed)
            .transfer(base, other, kind, 8, date(10), TransferStatus::InTransit)
            .assignment(base, kind, 1, date(2), AssignmentStatus::Active)
            .assignment(base, kind, 3, date(11), AssignmentStatus::Expended)
            .assignment(base, kind, 6, date(11), AssignmentStatus::Returned);

        let range = DateRange::new(date(5), date(15)).unwrap();

        let opening = ledger
            .movement_totals(base, LedgerWindow::Before(range.start()), None)
            .await
            .unwrap();
        assert_eq!(opening.len(), 1);
        assert_eq!(opening[0].totals.purchases, 10);
        assert_eq!(opening[0].totals.assigned, 1);

        let period = ledger
            .movement_totals(base, LedgerWindow::Within(range), None)
            .await
            .unwrap();
        let totals = period[0].totals;
        assert_eq!(totals.purchases, 5);
        assert_eq!(totals.transfers_out, 2);
        assert_eq!(totals.assigned, 1);
        assert_eq!(totals.expended, 3);
    }

    #[tokio::test]
    async fn test_late_status_changes_count_on_their_effective_day() {
        let base = BaseId::new();
        let other = BaseId::new();
        let kind = EquipmentTypeId::new();
        let august = NaiveDate::from_ymd_opt(2024, 8, 4).unwrap();
        let ledger = InMemoryLedger::new()
            .transfer_completed_on(other, base, kind, 9, date(3), august)
            .assignment_expended_on(base, kind, 2, date(4), august);

        let june = LedgerWindow::Within(DateRange::new(date(1), date(30)).unwrap());
        let totals = ledger.movement_totals(base, june, None).await.unwrap()[0].totals;
        assert_eq!(totals.transfers_in, 0);
        assert_eq!(totals.expended, 0);
        assert_eq!(totals.assigned, 2);

        let later = LedgerWindow::Within(DateRange::new(august, august).unwrap());
        let totals = ledger.movement_totals(base, later, None).await.unwrap()[0].totals;
        assert_eq!(totals.transfers_in, 9);
        assert_eq!(totals.expended, 2);
        assert_eq!(totals.assigned, 0);
    }

    #[tokio::test]
    async fn test_failing_ledger_counts_reads() {
        let ledger = InMemoryLedger::new().failing("disk on fire");

        let err = ledger.list_bases().await.unwrap_err();

        assert_eq!(err.message(), "disk on fire");
        assert_eq!(ledger.read_count(), 1);
    }
}

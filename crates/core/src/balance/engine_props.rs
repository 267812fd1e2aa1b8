//! Property tests for the balance engine.

use chrono::{Days, NaiveDate};
use garrison_shared::types::{BaseId, EquipmentTypeId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{
    BalanceEngine, DateRange, InMemoryLedger, MetricsReport, MetricsResult, MovementTotals,
};
use crate::ledger::{AssignmentStatus, EquipmentCategory, TransferStatus};

#[derive(Debug, Clone)]
enum Row {
    Purchase {
        at_alpha: bool,
        rifle: bool,
        quantity: i64,
        day: u64,
    },
    Transfer {
        alpha_to_bravo: bool,
        rifle: bool,
        quantity: i64,
        day: u64,
        status: TransferStatus,
    },
    Assignment {
        at_alpha: bool,
        rifle: bool,
        quantity: i64,
        day: u64,
        status: AssignmentStatus,
    },
}

fn transfer_status_strategy() -> impl Strategy<Value = TransferStatus> {
    prop_oneof![
        Just(TransferStatus::Pending),
        Just(TransferStatus::InTransit),
        Just(TransferStatus::Completed),
        Just(TransferStatus::Cancelled),
    ]
}

fn assignment_status_strategy() -> impl Strategy<Value = AssignmentStatus> {
    prop_oneof![
        Just(AssignmentStatus::Active),
        Just(AssignmentStatus::Returned),
        Just(AssignmentStatus::Expended),
    ]
}

fn row_strategy() -> impl Strategy<Value = Row> {
    prop_oneof![
        (any::<bool>(), any::<bool>(), 1..500i64, 0..90u64).prop_map(
            |(at_alpha, rifle, quantity, day)| Row::Purchase {
                at_alpha,
                rifle,
                quantity,
                day,
            }
        ),
        (
            any::<bool>(),
            any::<bool>(),
            1..100i64,
            0..90u64,
            transfer_status_strategy()
        )
            .prop_map(|(alpha_to_bravo, rifle, quantity, day, status)| Row::Transfer {
                alpha_to_bravo,
                rifle,
                quantity,
                day,
                status,
            }),
        (
            any::<bool>(),
            any::<bool>(),
            1..50i64,
            0..90u64,
            assignment_status_strategy()
        )
            .prop_map(|(at_alpha, rifle, quantity, day, status)| Row::Assignment {
                at_alpha,
                rifle,
                quantity,
                day,
                status,
            }),
    ]
}

struct World {
    alpha: BaseId,
    bravo: BaseId,
    rifle: EquipmentTypeId,
    radio: EquipmentTypeId,
}

impl World {
    fn new() -> Self {
        Self {
            alpha: BaseId::new(),
            bravo: BaseId::new(),
            rifle: EquipmentTypeId::new(),
            radio: EquipmentTypeId::new(),
        }
    }

    fn base(&self, alpha: bool) -> BaseId {
        if alpha { self.alpha } else { self.bravo }
    }

    fn kind(&self, rifle: bool) -> EquipmentTypeId {
        if rifle { self.rifle } else { self.radio }
    }

    fn ledger(&self, rows: &[Row]) -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new()
            .with_base(self.alpha, "Alpha", true)
            .with_base(self.bravo, "Bravo", true)
            .with_equipment_type(self.rifle, "Rifle", EquipmentCategory::Weapon)
            .with_equipment_type(self.radio, "Radio", EquipmentCategory::Communication);

        for row in rows {
            ledger = match *row {
                Row::Purchase {
                    at_alpha,
                    rifle,
                    quantity,
                    day,
                } => ledger.purchase(self.base(at_alpha), self.kind(rifle), quantity, day_of(day)),
                Row::Transfer {
                    alpha_to_bravo,
                    rifle,
                    quantity,
                    day,
                    status,
                } => ledger.transfer(
                    self.base(alpha_to_bravo),
                    self.base(!alpha_to_bravo),
                    self.kind(rifle),
                    quantity,
                    day_of(day),
                    status,
                ),
                Row::Assignment {
                    at_alpha,
                    rifle,
                    quantity,
                    day,
                    status,
                } => ledger.assignment(
                    self.base(at_alpha),
                    self.kind(rifle),
                    quantity,
                    day_of(day),
                    status,
                ),
            };
        }
        ledger
    }
}

fn day_of(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(offset))
        .unwrap()
}

fn range_of(a: u64, b: u64) -> DateRange {
    DateRange::new(day_of(a.min(b)), day_of(a.max(b))).unwrap()
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn compute(ledger: &InMemoryLedger, base: BaseId, range: DateRange, kind: Option<EquipmentTypeId>) -> MetricsReport {
    run(BalanceEngine::new(ledger).compute_metrics(base, range, kind)).unwrap()
}

fn closing_holds(m: &MetricsResult) -> bool {
    m.closing_balance
        == m.opening_balance + m.purchases + m.transfers_in - m.transfers_out - m.expended
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// closing = opening + purchases + in − out − expended, for the aggregate and every type.
    #[test]
    fn prop_closing_balance_identity(
        rows in prop::collection::vec(row_strategy(), 0..40),
        a in 0..90u64,
        b in 0..90u64,
        alpha in any::<bool>(),
    ) {
        let world = World::new();
        let ledger = world.ledger(&rows);
        let report = compute(&ledger, world.base(alpha), range_of(a, b), None);

        prop_assert!(closing_holds(&report.totals));
        for t in &report.by_equipment_type {
            prop_assert!(closing_holds(&t.metrics));
        }
        prop_assert_eq!(
            report.totals.net_movement,
            report.totals.purchases + report.totals.transfers_in - report.totals.transfers_out
        );
    }

    /// The aggregate equals the sum of the per-type figures.
    #[test]
    fn prop_aggregate_is_sum_of_types(
        rows in prop::collection::vec(row_strategy(), 0..40),
        a in 0..90u64,
        b in 0..90u64,
    ) {
        let world = World::new();
        let ledger = world.ledger(&rows);
        let report = compute(&ledger, world.alpha, range_of(a, b), None);

        let opening: i64 = report.by_equipment_type.iter().map(|t| t.metrics.opening_balance).sum();
        let closing: i64 = report.by_equipment_type.iter().map(|t| t.metrics.closing_balance).sum();
        prop_assert_eq!(opening, report.totals.opening_balance);
        prop_assert_eq!(closing, report.totals.closing_balance);
    }

    /// Per-type filtered reports agree with the unfiltered breakdown.
    #[test]
    fn prop_filter_matches_breakdown(
        rows in prop::collection::vec(row_strategy(), 0..40),
        a in 0..90u64,
        b in 0..90u64,
        rifle in any::<bool>(),
    ) {
        let world = World::new();
        let ledger = world.ledger(&rows);
        let range = range_of(a, b);
        let kind = world.kind(rifle);

        let full = compute(&ledger, world.alpha, range, None);
        let filtered = compute(&ledger, world.alpha, range, Some(kind));

        let row = full.by_equipment_type.iter().find(|t| t.equipment_type_id == kind).unwrap();
        prop_assert_eq!(row.metrics, filtered.totals);
    }

    /// A zero opening balance always gives a zero percent change.
    #[test]
    fn prop_zero_opening_zero_percent(
        period in (0..1000i64, 0..1000i64, 0..1000i64, 0..1000i64, 0..1000i64),
    ) {
        let (purchases, transfers_in, transfers_out, assigned, expended) = period;
        let period = MovementTotals { purchases, transfers_in, transfers_out, assigned, expended };
        let m = MetricsResult::from_movements(&MovementTotals::default(), &period);

        prop_assert_eq!(m.opening_balance, 0);
        prop_assert_eq!(m.percent_change, Decimal::ZERO);
    }

    /// Transfers that are not completed never move a balance.
    #[test]
    fn prop_incomplete_transfers_are_invisible(
        rows in prop::collection::vec(row_strategy(), 0..30),
        status in prop_oneof![
            Just(TransferStatus::Pending),
            Just(TransferStatus::InTransit),
            Just(TransferStatus::Cancelled),
        ],
        quantity in 1..100i64,
        day in 0..90u64,
        a in 0..90u64,
        b in 0..90u64,
    ) {
        let world = World::new();
        let range = range_of(a, b);
        let before = world.ledger(&rows);

        let mut with_extra = rows.clone();
        with_extra.push(Row::Transfer { alpha_to_bravo: true, rifle: true, quantity, day, status });
        let after = world.ledger(&with_extra);

        for base in [world.alpha, world.bravo] {
            prop_assert_eq!(
                compute(&before, base, range, None).totals,
                compute(&after, base, range, None).totals
            );
        }
    }

    /// Computing twice over the same ledger gives the same report.
    #[test]
    fn prop_compute_is_idempotent(
        rows in prop::collection::vec(row_strategy(), 0..40),
        a in 0..90u64,
        b in 0..90u64,
    ) {
        let world = World::new();
        let ledger = world.ledger(&rows);
        let range = range_of(a, b);

        prop_assert_eq!(
            compute(&ledger, world.bravo, range, None),
            compute(&ledger, world.bravo, range, None)
        );
    }

    /// A completed transfer moves the same quantity out of one base and into the other.
    #[test]
    fn prop_completed_transfer_conserves_units(
        rows in prop::collection::vec(row_strategy(), 0..30),
        a in 0..90u64,
        b in 0..90u64,
    ) {
        let world = World::new();
        let ledger = world.ledger(&rows);
        let range = range_of(a, b);

        let alpha = compute(&ledger, world.alpha, range, None).totals;
        let bravo = compute(&ledger, world.bravo, range, None).totals;
        prop_assert_eq!(alpha.transfers_out, bravo.transfers_in);
        prop_assert_eq!(alpha.transfers_in, bravo.transfers_out);
    }
}

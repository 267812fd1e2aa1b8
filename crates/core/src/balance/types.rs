//! Balance engine types.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use garrison_shared::types::{BaseId, EquipmentTypeId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::error::BalanceError;
use crate::ledger::EquipmentCategory;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::InvalidDateRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BalanceError> {
        if start > end {
            return Err(BalanceError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::MalformedDate` for anything that is not a real
    /// calendar date, and `InvalidDateRange` if the range is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self, BalanceError> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| BalanceError::MalformedDate(raw.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The slice of the ledger a movement query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerWindow {
    /// Everything dated strictly before the given day. Used for opening balances.
    Before(NaiveDate),
    /// Everything dated within the range.
    Within(DateRange),
}

impl LedgerWindow {
    /// Returns true if a dated movement belongs to the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::Before(cutoff) => date < *cutoff,
            Self::Within(range) => range.contains(date),
        }
    }

    /// Returns true if an active assignment dated `date` is still outstanding
    /// at the end of the window.
    #[must_use]
    pub fn holds_assignment(&self, date: NaiveDate) -> bool {
        match self {
            Self::Before(cutoff) => date < *cutoff,
            Self::Within(range) => date <= range.end(),
        }
    }

    /// Returns true if something happening on `date` is still in the future
    /// when the window closes.
    #[must_use]
    pub fn is_after_close(&self, date: NaiveDate) -> bool {
        match self {
            Self::Before(cutoff) => date >= *cutoff,
            Self::Within(range) => date > range.end(),
        }
    }
}

/// Summed movement quantities for one slice of the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovementTotals {
    /// Units purchased.
    pub purchases: i64,
    /// Units received through completed transfers.
    pub transfers_in: i64,
    /// Units sent through completed transfers.
    pub transfers_out: i64,
    /// Units held by active assignments.
    pub assigned: i64,
    /// Units expended.
    pub expended: i64,
}

impl MovementTotals {
    /// Purchases plus transfers in minus transfers out.
    #[must_use]
    pub const fn net_movement(&self) -> i64 {
        self.purchases + self.transfers_in - self.transfers_out
    }

    /// Change to the on-hand balance: net movement minus expenditures.
    #[must_use]
    pub const fn balance_change(&self) -> i64 {
        self.net_movement() - self.expended
    }
}

impl Add for MovementTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            purchases: self.purchases + rhs.purchases,
            transfers_in: self.transfers_in + rhs.transfers_in,
            transfers_out: self.transfers_out + rhs.transfers_out,
            assigned: self.assigned + rhs.assigned,
            expended: self.expended + rhs.expended,
        }
    }
}

impl AddAssign for MovementTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MovementTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Movement totals for one equipment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMovements {
    /// Equipment type the totals belong to.
    pub equipment_type_id: EquipmentTypeId,
    /// Summed movements.
    pub totals: MovementTotals,
}

/// A base as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseInfo {
    /// Base ID.
    pub id: BaseId,
    /// Display name.
    pub name: String,
    /// Location.
    pub location: String,
    /// Inactive bases cannot be queried.
    pub is_active: bool,
}

/// An equipment type as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentTypeInfo {
    /// Equipment type ID.
    pub id: EquipmentTypeId,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: EquipmentCategory,
}

/// Percent change from `opening` to `closing`, rounded half away from zero
/// to two places. Zero when `opening` is zero.
#[must_use]
pub fn percent_change(opening: i64, closing: i64) -> Decimal {
    if opening == 0 {
        return Decimal::ZERO;
    }
    let delta = Decimal::from(closing) - Decimal::from(opening);
    (delta * Decimal::ONE_HUNDRED / Decimal::from(opening))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Balance figures for one partition of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsResult {
    /// Balance on the day before the range starts.
    pub opening_balance: i64,
    /// Balance at the end of the range.
    pub closing_balance: i64,
    /// Units purchased in range.
    pub purchases: i64,
    /// Units received in range.
    pub transfers_in: i64,
    /// Units sent in range.
    pub transfers_out: i64,
    /// Units on active assignment at range end.
    pub assigned: i64,
    /// Units expended in range.
    pub expended: i64,
    /// Purchases plus transfers in minus transfers out.
    pub net_movement: i64,
    /// Percent change from opening to closing.
    pub percent_change: Decimal,
}

impl MetricsResult {
    /// Builds the figures from the opening slice and the in-range slice.
    #[must_use]
    pub fn from_movements(opening: &MovementTotals, period: &MovementTotals) -> Self {
        let opening_balance = opening.balance_change();
        let closing_balance = opening_balance + period.balance_change();

        Self {
            opening_balance,
            closing_balance,
            purchases: period.purchases,
            transfers_in: period.transfers_in,
            transfers_out: period.transfers_out,
            assigned: period.assigned,
            expended: period.expended,
            net_movement: period.net_movement(),
            percent_change: percent_change(opening_balance, closing_balance),
        }
    }
}

/// Figures for a single equipment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMetrics {
    /// Equipment type ID.
    pub equipment_type_id: EquipmentTypeId,
    /// Display name, when the type is known.
    pub equipment_type_name: Option<String>,
    /// The type's figures.
    pub metrics: MetricsResult,
}

/// Result of one balance computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsReport {
    /// The base the figures belong to.
    pub base: BaseInfo,
    /// The queried range.
    pub range: DateRange,
    /// The equipment type filter, if any.
    pub equipment_type_filter: Option<EquipmentTypeId>,
    /// Figures summed across every reported type.
    pub totals: MetricsResult,
    /// Per-type figures.
    pub by_equipment_type: Vec<TypeMetrics>,
}

//! Balance engine.
//!
//! Derives opening and closing balances plus movement totals for a base over
//! an inclusive date range. Balances are never stored; every figure is a sum
//! over ledger rows read through the [`LedgerReader`] port.
//!
//! ```text
//! opening = Σ movements dated before start
//! closing = opening + purchases + transfers_in − transfers_out − expended
//! net     = purchases + transfers_in − transfers_out
//! ```
//!
//! Only completed transfers count. `assigned` is informational: it reduces
//! what is available, not what is on the books.

mod engine;
mod error;
mod memory;
mod reader;
mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{BalanceEngine, aggregate_movements};
pub use error::BalanceError;
pub use memory::InMemoryLedger;
pub use reader::{LedgerReadError, LedgerReader};
pub use types::{
    BaseInfo, DateRange, EquipmentTypeInfo, LedgerWindow, MetricsReport, MetricsResult,
    MovementTotals, TypeMetrics, TypeMovements, percent_change,
};

//! Ledger record rules.
//!
//! Purchases, transfers and assignments are append-mostly ledger rows. This
//! module validates new rows and status transitions before they are
//! persisted. Balances themselves are derived in [`crate::balance`].

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerRecordError;
pub use types::{
    AssignmentStatus, EquipmentCategory, NewAssignment, NewPurchase, NewTransfer, TransferStatus,
};
pub use validation::{
    validate_assignment, validate_assignment_transition, validate_effective_date,
    validate_purchase, validate_transfer, validate_transfer_transition,
};

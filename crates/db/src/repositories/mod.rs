//! Repository implementations for data access.

pub mod assignment;
pub mod base;
pub mod equipment_type;
pub mod ledger;
pub mod purchase;
pub mod transfer;
pub mod user;

pub use assignment::AssignmentRepository;
pub use base::BaseRepository;
pub use equipment_type::EquipmentTypeRepository;
pub use ledger::LedgerRepository;
pub use purchase::PurchaseRepository;
pub use transfer::TransferRepository;
pub use user::UserRepository;

use chrono::NaiveDate;
use uuid::Uuid;

/// Filters shared by the ledger list queries.
///
/// `base_id: None` means every base. Dates are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    /// Restrict to one base.
    pub base_id: Option<Uuid>,
    /// Restrict to one equipment type.
    pub equipment_type_id: Option<Uuid>,
    /// Earliest date.
    pub start_date: Option<NaiveDate>,
    /// Latest date.
    pub end_date: Option<NaiveDate>,
}

//! Balance engine errors.

use chrono::NaiveDate;
use garrison_shared::types::{BaseId, EquipmentTypeId};
use thiserror::Error;

use super::reader::LedgerReadError;

/// Errors returned by the balance engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// The base does not exist.
    #[error("base not found: {0}")]
    BaseNotFound(BaseId),

    /// The base exists but has been deactivated.
    #[error("base {0} is inactive")]
    BaseInactive(BaseId),

    /// Range start is after range end.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// A date string is not a valid calendar date.
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    MalformedDate(String),

    /// The equipment type filter references nothing.
    #[error("unknown equipment type: {0}")]
    UnknownEquipmentType(EquipmentTypeId),

    /// The ledger could not be read.
    #[error(transparent)]
    LedgerUnavailable(#[from] LedgerReadError),
}

impl BalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BaseNotFound(_) => "NOT_FOUND",
            Self::BaseInactive(_)
            | Self::InvalidDateRange { .. }
            | Self::MalformedDate(_)
            | Self::UnknownEquipmentType(_) => "INVALID_ARGUMENT",
            Self::LedgerUnavailable(_) => "UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::BaseNotFound(_) => 404,
            Self::BaseInactive(_)
            | Self::InvalidDateRange { .. }
            | Self::MalformedDate(_)
            | Self::UnknownEquipmentType(_) => 400,
            Self::LedgerUnavailable(_) => 503,
        }
    }
}

//! Ledger record errors.

use chrono::NaiveDate;
use thiserror::Error;

use super::types::{AssignmentStatus, TransferStatus};

/// Errors raised while validating ledger records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerRecordError {
    /// Quantities must be strictly positive.
    #[error("quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(i32),

    /// Unit cost cannot be negative.
    #[error("unit cost cannot be negative")]
    NegativeUnitCost,

    /// Unit cost times quantity does not fit a decimal.
    #[error("total cost overflows")]
    CostOverflow,

    /// A transfer must move equipment between two different bases.
    #[error("source and destination base must differ")]
    SameSourceAndDestination,

    /// Assignments need someone to assign to.
    #[error("assignee cannot be empty")]
    EmptyAssignee,

    /// A transfer cannot start out in this status.
    #[error("a transfer cannot be recorded as {0}")]
    InvalidInitialTransferStatus(TransferStatus),

    /// An assignment cannot start out in this status.
    #[error("an assignment cannot be recorded as {0}")]
    InvalidInitialAssignmentStatus(AssignmentStatus),

    /// The transfer status change is not allowed.
    #[error("transfer cannot move from {from} to {to}")]
    InvalidTransferTransition {
        /// Current status.
        from: TransferStatus,
        /// Requested status.
        to: TransferStatus,
    },

    /// The assignment status change is not allowed.
    #[error("assignment cannot move from {from} to {to}")]
    InvalidAssignmentTransition {
        /// Current status.
        from: AssignmentStatus,
        /// Requested status.
        to: AssignmentStatus,
    },

    /// A status change cannot take effect before the record's own date.
    #[error("effective date {effective_on} is before the record date {recorded_on}")]
    EffectiveBeforeRecord {
        /// Date the record carries.
        recorded_on: NaiveDate,
        /// Requested effective date.
        effective_on: NaiveDate,
    },

    /// An enum field carried an unknown value.
    #[error("unknown {field}: {value}")]
    UnknownValue {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl LedgerRecordError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_)
            | Self::NegativeUnitCost
            | Self::CostOverflow
            | Self::SameSourceAndDestination
            | Self::EmptyAssignee
            | Self::EffectiveBeforeRecord { .. }
            | Self::UnknownValue { .. } => "INVALID_ARGUMENT",
            Self::InvalidInitialTransferStatus(_) | Self::InvalidInitialAssignmentStatus(_) => {
                "INVALID_STATUS"
            }
            Self::InvalidTransferTransition { .. } | Self::InvalidAssignmentTransition { .. } => {
                "INVALID_STATUS_TRANSITION"
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTransferTransition { .. } | Self::InvalidAssignmentTransition { .. } => 409,
            Self::InvalidInitialTransferStatus(_) | Self::InvalidInitialAssignmentStatus(_) => 422,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerRecordError::NonPositiveQuantity(0).error_code(), "INVALID_ARGUMENT");
        assert_eq!(
            LedgerRecordError::InvalidTransferTransition {
                from: TransferStatus::Completed,
                to: TransferStatus::Pending,
            }
            .error_code(),
            "INVALID_STATUS_TRANSITION"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerRecordError::SameSourceAndDestination.http_status_code(), 400);
        assert_eq!(
            LedgerRecordError::InvalidAssignmentTransition {
                from: AssignmentStatus::Returned,
                to: AssignmentStatus::Active,
            }
            .http_status_code(),
            409
        );
        assert_eq!(
            LedgerRecordError::InvalidInitialTransferStatus(TransferStatus::Cancelled)
                .http_status_code(),
            422
        );
    }

    #[test]
    fn test_effective_before_record_is_bad_request() {
        let err = LedgerRecordError::EffectiveBeforeRecord {
            recorded_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            effective_on: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert_eq!(
            err.to_string(),
            "effective date 2024-01-09 is before the record date 2024-01-10"
        );
    }

    #[test]
    fn test_transition_message() {
        let err = LedgerRecordError::InvalidTransferTransition {
            from: TransferStatus::Cancelled,
            to: TransferStatus::Completed,
        };
        assert_eq!(err.to_string(), "transfer cannot move from cancelled to completed");
    }
}

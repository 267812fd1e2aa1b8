//! Validation for new ledger rows and status changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerRecordError;
use super::types::{AssignmentStatus, NewAssignment, NewPurchase, NewTransfer, TransferStatus};

fn validate_quantity(quantity: i32) -> Result<(), LedgerRecordError> {
    if quantity <= 0 {
        return Err(LedgerRecordError::NonPositiveQuantity(quantity));
    }
    Ok(())
}

/// Validates a purchase and returns its total cost.
///
/// # Errors
///
/// Returns an error if the quantity is not positive, the unit cost is
/// negative, or the total cost overflows.
pub fn validate_purchase(purchase: &NewPurchase) -> Result<Decimal, LedgerRecordError> {
    validate_quantity(purchase.quantity)?;

    if purchase.unit_cost.is_sign_negative() && !purchase.unit_cost.is_zero() {
        return Err(LedgerRecordError::NegativeUnitCost);
    }

    purchase
        .unit_cost
        .checked_mul(Decimal::from(purchase.quantity))
        .ok_or(LedgerRecordError::CostOverflow)
}

/// Validates a transfer.
///
/// # Errors
///
/// Returns an error if the quantity is not positive, both bases are the
/// same, or the initial status is `cancelled`.
pub fn validate_transfer(transfer: &NewTransfer) -> Result<(), LedgerRecordError> {
    validate_quantity(transfer.quantity)?;

    if transfer.source_base_id == transfer.destination_base_id {
        return Err(LedgerRecordError::SameSourceAndDestination);
    }

    if !transfer.status.is_valid_initial() {
        return Err(LedgerRecordError::InvalidInitialTransferStatus(transfer.status));
    }

    Ok(())
}

/// Validates an assignment or direct expenditure.
///
/// # Errors
///
/// Returns an error if the quantity is not positive, the assignee is blank,
/// or the initial status is `returned`.
pub fn validate_assignment(assignment: &NewAssignment) -> Result<(), LedgerRecordError> {
    validate_quantity(assignment.quantity)?;

    if assignment.assignee.trim().is_empty() {
        return Err(LedgerRecordError::EmptyAssignee);
    }

    if !assignment.status.is_valid_initial() {
        return Err(LedgerRecordError::InvalidInitialAssignmentStatus(assignment.status));
    }

    Ok(())
}

/// Checks a transfer status change.
///
/// # Errors
///
/// Returns `InvalidTransferTransition` if the move is not allowed.
pub fn validate_transfer_transition(
    from: TransferStatus,
    to: TransferStatus,
) -> Result<(), LedgerRecordError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(LedgerRecordError::InvalidTransferTransition { from, to })
    }
}

/// Checks an assignment status change.
///
/// # Errors
///
/// Returns `InvalidAssignmentTransition` if the move is not allowed.
pub fn validate_assignment_transition(
    from: AssignmentStatus,
    to: AssignmentStatus,
) -> Result<(), LedgerRecordError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(LedgerRecordError::InvalidAssignmentTransition { from, to })
    }
}

/// Checks the day a status change takes effect.
///
/// Completions and expenditures move stock on `effective_on`, which may not
/// precede the date the record itself carries.
///
/// # Errors
///
/// Returns `EffectiveBeforeRecord` if `effective_on` is earlier than
/// `recorded_on`.
pub fn validate_effective_date(
    recorded_on: NaiveDate,
    effective_on: NaiveDate,
) -> Result<(), LedgerRecordError> {
    if effective_on < recorded_on {
        return Err(LedgerRecordError::EffectiveBeforeRecord {
            recorded_on,
            effective_on,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use garrison_shared::types::{BaseId, EquipmentTypeId};
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn purchase(quantity: i32, unit_cost: Decimal) -> NewPurchase {
        NewPurchase {
            base_id: BaseId::new(),
            equipment_type_id: EquipmentTypeId::new(),
            quantity,
            unit_cost,
            purchase_date: date(),
        }
    }

    #[test]
    fn test_purchase_total_cost() {
        assert_eq!(validate_purchase(&purchase(20, dec!(1250.50))).unwrap(), dec!(25010.00));
        assert_eq!(validate_purchase(&purchase(3, Decimal::ZERO)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_purchase_rejects_bad_input() {
        assert_eq!(
            validate_purchase(&purchase(0, dec!(10))),
            Err(LedgerRecordError::NonPositiveQuantity(0))
        );
        assert_eq!(
            validate_purchase(&purchase(5, dec!(-1))),
            Err(LedgerRecordError::NegativeUnitCost)
        );
        assert_eq!(
            validate_purchase(&purchase(i32::MAX, Decimal::MAX)),
            Err(LedgerRecordError::CostOverflow)
        );
    }

    #[test]
    fn test_transfer_requires_distinct_bases() {
        let base = BaseId::new();
        let transfer = NewTransfer {
            source_base_id: base,
            destination_base_id: base,
            equipment_type_id: EquipmentTypeId::new(),
            quantity: 7,
            transfer_date: date(),
            status: TransferStatus::Pending,
        };
        assert_eq!(
            validate_transfer(&transfer),
            Err(LedgerRecordError::SameSourceAndDestination)
        );
    }

    #[test]
    fn test_transfer_cannot_start_cancelled() {
        let transfer = NewTransfer {
            source_base_id: BaseId::new(),
            destination_base_id: BaseId::new(),
            equipment_type_id: EquipmentTypeId::new(),
            quantity: 7,
            transfer_date: date(),
            status: TransferStatus::Cancelled,
        };
        assert_eq!(
            validate_transfer(&transfer),
            Err(LedgerRecordError::InvalidInitialTransferStatus(TransferStatus::Cancelled))
        );
    }

    #[test]
    fn test_assignment_rules() {
        let mut assignment = NewAssignment {
            base_id: BaseId::new(),
            equipment_type_id: EquipmentTypeId::new(),
            quantity: 2,
            assignee: "Sgt. Reyes".to_string(),
            assignment_date: date(),
            status: AssignmentStatus::Active,
        };
        assert!(validate_assignment(&assignment).is_ok());

        assignment.status = AssignmentStatus::Expended;
        assert!(validate_assignment(&assignment).is_ok());

        assignment.status = AssignmentStatus::Returned;
        assert_eq!(
            validate_assignment(&assignment),
            Err(LedgerRecordError::InvalidInitialAssignmentStatus(AssignmentStatus::Returned))
        );

        assignment.status = AssignmentStatus::Active;
        assignment.assignee = "   ".to_string();
        assert_eq!(validate_assignment(&assignment), Err(LedgerRecordError::EmptyAssignee));
    }

    #[test]
    fn test_transition_helpers() {
        assert!(validate_transfer_transition(TransferStatus::Pending, TransferStatus::InTransit).is_ok());
        assert!(
            validate_transfer_transition(TransferStatus::Completed, TransferStatus::Cancelled)
                .is_err()
        );
        assert!(
            validate_assignment_transition(AssignmentStatus::Active, AssignmentStatus::Returned)
                .is_ok()
        );
        assert!(
            validate_assignment_transition(AssignmentStatus::Expended, AssignmentStatus::Active)
                .is_err()
        );
    }

    #[test]
    fn test_effective_date_not_before_record() {
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(validate_effective_date(date(), date()).is_ok());
        assert!(validate_effective_date(date(), march).is_err());
        assert!(validate_effective_date(march, date()).is_ok());
    }
}

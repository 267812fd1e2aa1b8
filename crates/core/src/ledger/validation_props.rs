//! Property tests for ledger record rules.

use proptest::prelude::*;

use super::types::{AssignmentStatus, TransferStatus};
use super::validation::{validate_assignment_transition, validate_transfer_transition};

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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Final statuses never move.
    #[test]
    fn prop_final_transfer_status_is_sticky(
        from in transfer_status_strategy(),
        to in transfer_status_strategy(),
    ) {
        if from.is_final() {
            prop_assert!(validate_transfer_transition(from, to).is_err());
        }
    }

    /// No status transitions to itself.
    #[test]
    fn prop_no_self_transitions(
        transfer in transfer_status_strategy(),
        assignment in assignment_status_strategy(),
    ) {
        prop_assert!(validate_transfer_transition(transfer, transfer).is_err());
        prop_assert!(validate_assignment_transition(assignment, assignment).is_err());
    }

    /// A transfer can never leave `completed`, so a counted movement is never uncounted.
    #[test]
    fn prop_completed_transfer_stays_counted(to in transfer_status_strategy()) {
        prop_assert!(!TransferStatus::Completed.can_transition_to(to));
    }

    /// Only active assignments can change.
    #[test]
    fn prop_only_active_assignments_move(
        from in assignment_status_strategy(),
        to in assignment_status_strategy(),
    ) {
        if validate_assignment_transition(from, to).is_ok() {
            prop_assert_eq!(from, AssignmentStatus::Active);
        }
    }
}

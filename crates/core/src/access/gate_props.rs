//! Property tests for the access gate.

use garrison_shared::types::{BaseId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

use super::{AccessGate, Action, Decision, DenyReason, Principal, Role, role_satisfies};

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::LogisticsOfficer),
        Just(Role::BaseCommander),
        Just(Role::Admin),
    ]
}

fn non_admin_role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::LogisticsOfficer), Just(Role::BaseCommander)]
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::ViewDashboard),
        Just(Action::ViewPurchases),
        Just(Action::RecordPurchase),
        Just(Action::ViewTransfers),
        Just(Action::RecordTransfer),
        Just(Action::UpdateTransferStatus),
        Just(Action::ViewAssignments),
        Just(Action::RecordAssignment),
        Just(Action::UpdateAssignmentStatus),
        Just(Action::ViewReferenceData),
        Just(Action::ManageBases),
        Just(Action::ManageEquipmentTypes),
    ]
}

fn base_id_strategy() -> impl Strategy<Value = BaseId> {
    any::<u128>().prop_map(|n| BaseId::from_uuid(Uuid::from_u128(n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Admins are allowed every action on every base, home base or not.
    #[test]
    fn prop_admin_always_allowed(
        action in action_strategy(),
        home in proptest::option::of(base_id_strategy()),
        target in proptest::option::of(base_id_strategy()),
    ) {
        let admin = Principal::new(UserId::new(), Role::Admin, home);
        prop_assert_eq!(AccessGate::authorize(&admin, action, target), Decision::Allow);
        prop_assert!(AccessGate::authorize_role(&admin, Role::Admin, target).is_allowed());
    }

    /// A non-admin is never allowed a base-scoped action on a base other than home.
    #[test]
    fn prop_non_admin_never_reaches_foreign_base(
        role in non_admin_role_strategy(),
        action in action_strategy(),
        home in base_id_strategy(),
        target in base_id_strategy(),
    ) {
        prop_assume!(home != target);
        prop_assume!(action.is_base_scoped());

        let principal = Principal::new(UserId::new(), role, Some(home));
        prop_assert!(!AccessGate::authorize(&principal, action, Some(target)).is_allowed());
    }

    /// At the home base, the decision is exactly the role check.
    #[test]
    fn prop_home_base_decision_matches_role(
        role in role_strategy(),
        action in action_strategy(),
        home in base_id_strategy(),
    ) {
        let principal = Principal::new(UserId::new(), role, Some(home));
        let allowed = AccessGate::authorize(&principal, action, Some(home)).is_allowed();
        prop_assert_eq!(allowed, role_satisfies(role, action.required_role()));
    }

    /// Role satisfaction is a total order: reflexive and transitive.
    #[test]
    fn prop_role_satisfies_is_ordered(
        a in role_strategy(),
        b in role_strategy(),
        c in role_strategy(),
    ) {
        prop_assert!(role_satisfies(a, a));
        if role_satisfies(a, b) && role_satisfies(b, c) {
            prop_assert!(role_satisfies(a, c));
        }
        prop_assert!(role_satisfies(a, b) || role_satisfies(b, a));
    }

    /// Insufficient role always wins over base mismatch in the deny reason.
    #[test]
    fn prop_insufficient_role_reported_first(
        home in base_id_strategy(),
        target in base_id_strategy(),
    ) {
        let officer = Principal::new(UserId::new(), Role::LogisticsOfficer, Some(home));
        let decision = AccessGate::authorize(&officer, Action::RecordAssignment, Some(target));
        let is_role_denial = matches!(decision, Decision::Deny(DenyReason::InsufficientRole { .. }));
        prop_assert!(is_role_denial);
    }
}

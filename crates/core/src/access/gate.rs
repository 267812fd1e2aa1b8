//! Authorization decisions.

use std::fmt;

use garrison_shared::types::{BaseId, UserId};
use serde::Serialize;

use super::error::AccessError;
use super::role::{Role, role_satisfies};

/// Authenticated caller, as carried by the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// User ID.
    pub user_id: UserId,
    /// Role held by the user.
    pub role: Role,
    /// Home base. `None` is only meaningful for admins.
    pub home_base_id: Option<BaseId>,
}

impl Principal {
    /// Creates a principal snapshot.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role, home_base_id: Option<BaseId>) -> Self {
        Self {
            user_id,
            role,
            home_base_id,
        }
    }

    /// Returns true if the principal is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Operations guarded by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read balance metrics.
    ViewDashboard,
    /// List purchases.
    ViewPurchases,
    /// Record a purchase.
    RecordPurchase,
    /// List transfers.
    ViewTransfers,
    /// Record a transfer out of a base.
    RecordTransfer,
    /// Move a transfer through its lifecycle.
    UpdateTransferStatus,
    /// List assignments and expenditures.
    ViewAssignments,
    /// Assign or expend equipment.
    RecordAssignment,
    /// Return or expend an active assignment.
    UpdateAssignmentStatus,
    /// Read bases and equipment types.
    ViewReferenceData,
    /// Create or deactivate bases.
    ManageBases,
    /// Create equipment types.
    ManageEquipmentTypes,
}

impl Action {
    /// Minimum role allowed to perform the action.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::ViewDashboard
            | Self::ViewPurchases
            | Self::RecordPurchase
            | Self::ViewTransfers
            | Self::RecordTransfer
            | Self::UpdateTransferStatus
            | Self::ViewReferenceData => Role::LogisticsOfficer,
            Self::ViewAssignments | Self::RecordAssignment | Self::UpdateAssignmentStatus => {
                Role::BaseCommander
            }
            Self::ManageBases | Self::ManageEquipmentTypes => Role::Admin,
        }
    }

    /// Returns true if the action targets a specific base and is subject to
    /// home-base scoping.
    #[must_use]
    pub const fn is_base_scoped(self) -> bool {
        !matches!(
            self,
            Self::ViewReferenceData | Self::ManageBases | Self::ManageEquipmentTypes
        )
    }

    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ViewPurchases => "view_purchases",
            Self::RecordPurchase => "record_purchase",
            Self::ViewTransfers => "view_transfers",
            Self::RecordTransfer => "record_transfer",
            Self::UpdateTransferStatus => "update_transfer_status",
            Self::ViewAssignments => "view_assignments",
            Self::RecordAssignment => "record_assignment",
            Self::UpdateAssignmentStatus => "update_assignment_status",
            Self::ViewReferenceData => "view_reference_data",
            Self::ManageBases => "manage_bases",
            Self::ManageEquipmentTypes => "manage_equipment_types",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The principal's role is below the one required.
    InsufficientRole {
        /// Role the action requires.
        required: Role,
        /// Role the principal holds.
        actual: Role,
    },
    /// The target base is not the principal's home base.
    OutsideHomeBase {
        /// The principal's home base.
        home_base_id: BaseId,
        /// The base the request targets.
        target_base_id: BaseId,
    },
    /// A non-admin principal has no home base and cannot be scoped.
    MissingHomeBase,
    /// A non-admin principal asked for data across every base.
    AllBasesRequiresAdmin,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientRole { required, actual } => {
                write!(f, "role {actual} does not satisfy required role {required}")
            }
            Self::OutsideHomeBase { target_base_id, .. } => {
                write!(f, "base {target_base_id} is outside your home base")
            }
            Self::MissingHomeBase => f.write_str("no home base is assigned to this account"),
            Self::AllBasesRequiresAdmin => f.write_str("only admins may query every base"),
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed.
    Allow,
    /// The request is refused.
    Deny(DenyReason),
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into a result.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Forbidden` carrying the deny reason.
    pub const fn into_result(self) -> Result<(), AccessError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(AccessError::Forbidden(reason)),
        }
    }
}

/// Stateless authorization gate.
pub struct AccessGate;

impl AccessGate {
    /// Decides whether `principal` may act with `required_role` against
    /// `target_base_id`.
    ///
    /// Role is checked first. When a target base is given, non-admins must
    /// be stationed there. Without a target only the role matters.
    #[must_use]
    pub fn authorize_role(
        principal: &Principal,
        required_role: Role,
        target_base_id: Option<BaseId>,
    ) -> Decision {
        if !role_satisfies(principal.role, required_role) {
            return Decision::Deny(DenyReason::InsufficientRole {
                required: required_role,
                actual: principal.role,
            });
        }

        match target_base_id {
            None => Decision::Allow,
            Some(target) => Self::check_home_base(principal, target),
        }
    }

    /// Decides whether `principal` may perform `action`.
    ///
    /// For base-scoped actions `target_base_id == None` means "every base",
    /// which only admins may request.
    #[must_use]
    pub fn authorize(
        principal: &Principal,
        action: Action,
        target_base_id: Option<BaseId>,
    ) -> Decision {
        let required = action.required_role();

        if !action.is_base_scoped() {
            return Self::authorize_role(principal, required, None);
        }

        match target_base_id {
            Some(target) => Self::authorize_role(principal, required, Some(target)),
            None => match Self::authorize_role(principal, required, None) {
                Decision::Allow if principal.is_admin() => Decision::Allow,
                Decision::Allow if principal.home_base_id.is_none() => {
                    Decision::Deny(DenyReason::MissingHomeBase)
                }
                Decision::Allow => Decision::Deny(DenyReason::AllBasesRequiresAdmin),
                deny @ Decision::Deny(_) => deny,
            },
        }
    }

    /// Like [`AccessGate::authorize`], but as a result.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Forbidden` when the request is denied.
    pub fn require(
        principal: &Principal,
        action: Action,
        target_base_id: Option<BaseId>,
    ) -> Result<(), AccessError> {
        Self::authorize(principal, action, target_base_id).into_result()
    }

    /// Resolves which base a request should read when the caller may omit it.
    ///
    /// Non-admins default to their home base. Admins keep whatever they asked
    /// for, where `None` means every base.
    #[must_use]
    pub fn effective_base(principal: &Principal, requested: Option<BaseId>) -> Option<BaseId> {
        if principal.is_admin() {
            requested
        } else {
            requested.or(principal.home_base_id)
        }
    }

    fn check_home_base(principal: &Principal, target: BaseId) -> Decision {
        if principal.is_admin() {
            return Decision::Allow;
        }
        match principal.home_base_id {
            None => Decision::Deny(DenyReason::MissingHomeBase),
            Some(home) if home == target => Decision::Allow,
            Some(home) => Decision::Deny(DenyReason::OutsideHomeBase {
                home_base_id: home,
                target_base_id: target,
            }),
        }
    }
}

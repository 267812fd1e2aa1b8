//! Ledger record types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use garrison_shared::types::{BaseId, EquipmentTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerRecordError;

/// Equipment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    /// Small arms and crew-served weapons.
    Weapon,
    /// Ground vehicles.
    Vehicle,
    /// Rounds, shells and other consumables.
    Ammunition,
    /// Radios and comms gear.
    Communication,
    /// Anything else.
    Other,
}

impl EquipmentCategory {
    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Vehicle => "vehicle",
            Self::Ammunition => "ammunition",
            Self::Communication => "communication",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentCategory {
    type Err = LedgerRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weapon" => Ok(Self::Weapon),
            "vehicle" => Ok(Self::Vehicle),
            "ammunition" => Ok(Self::Ammunition),
            "communication" => Ok(Self::Communication),
            "other" => Ok(Self::Other),
            other => Err(LedgerRecordError::UnknownValue {
                field: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// Transfer lifecycle.
///
/// ```text
/// pending ──► in_transit ──► completed
///    │            │
///    └──► cancelled ◄┘
/// pending ──► completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Recorded, not yet shipped.
    Pending,
    /// Shipped, not yet received.
    InTransit,
    /// Received at the destination. The only status that moves balances.
    Completed,
    /// Called off.
    Cancelled,
}

impl TransferStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if a transfer in this status moves balances.
    #[must_use]
    pub const fn affects_balance(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if a transfer may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InTransit | Self::Completed | Self::Cancelled)
                | (Self::InTransit, Self::Completed | Self::Cancelled)
        )
    }

    /// Returns true if a transfer may be recorded directly in this status.
    #[must_use]
    pub const fn is_valid_initial(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = LedgerRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_transit" => Ok(Self::InTransit),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(LedgerRecordError::UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Assignment lifecycle: `active` ends as either `returned` or `expended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Issued to personnel, still on the books.
    Active,
    /// Handed back.
    Returned,
    /// Consumed or lost. Permanently leaves the base's balance.
    Expended,
}

impl AssignmentStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Returned => "returned",
            Self::Expended => "expended",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Returns true if an assignment may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Active, Self::Returned | Self::Expended))
    }

    /// Returns true if an assignment may be recorded directly in this status.
    ///
    /// Direct expenditures skip the `active` step.
    #[must_use]
    pub const fn is_valid_initial(self) -> bool {
        matches!(self, Self::Active | Self::Expended)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = LedgerRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "returned" => Ok(Self::Returned),
            "expended" => Ok(Self::Expended),
            other => Err(LedgerRecordError::UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// A purchase to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    /// Receiving base.
    pub base_id: BaseId,
    /// Equipment bought.
    pub equipment_type_id: EquipmentTypeId,
    /// Units bought.
    pub quantity: i32,
    /// Price per unit.
    pub unit_cost: Decimal,
    /// Date the purchase lands on the books.
    pub purchase_date: NaiveDate,
}

/// A transfer to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    /// Sending base.
    pub source_base_id: BaseId,
    /// Receiving base.
    pub destination_base_id: BaseId,
    /// Equipment moved.
    pub equipment_type_id: EquipmentTypeId,
    /// Units moved.
    pub quantity: i32,
    /// Transfer date.
    pub transfer_date: NaiveDate,
    /// Initial status, `pending` unless the transfer is already done.
    pub status: TransferStatus,
}

/// An assignment or expenditure to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    /// Base the equipment is drawn from.
    pub base_id: BaseId,
    /// Equipment issued.
    pub equipment_type_id: EquipmentTypeId,
    /// Units issued.
    pub quantity: i32,
    /// Person or unit receiving the equipment.
    pub assignee: String,
    /// Assignment date.
    pub assignment_date: NaiveDate,
    /// Initial status: `active`, or `expended` for direct expenditure.
    pub status: AssignmentStatus,
}

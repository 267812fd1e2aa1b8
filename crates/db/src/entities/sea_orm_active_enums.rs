//! `SeaORM` active enums mirroring the PostgreSQL enum types.

use garrison_core::access::Role;
use garrison_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "base_commander")]
    BaseCommander,
    #[sea_orm(string_value = "logistics_officer")]
    LogisticsOfficer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "equipment_category")]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    #[sea_orm(string_value = "weapon")]
    Weapon,
    #[sea_orm(string_value = "vehicle")]
    Vehicle,
    #[sea_orm(string_value = "ammunition")]
    Ammunition,
    #[sea_orm(string_value = "communication")]
    Communication,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transfer_status")]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assignment_status")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "expended")]
    Expended,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::BaseCommander => Self::BaseCommander,
            UserRole::LogisticsOfficer => Self::LogisticsOfficer,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::BaseCommander => Self::BaseCommander,
            Role::LogisticsOfficer => Self::LogisticsOfficer,
        }
    }
}

impl From<EquipmentCategory> for ledger::EquipmentCategory {
    fn from(category: EquipmentCategory) -> Self {
        match category {
            EquipmentCategory::Weapon => Self::Weapon,
            EquipmentCategory::Vehicle => Self::Vehicle,
            EquipmentCategory::Ammunition => Self::Ammunition,
            EquipmentCategory::Communication => Self::Communication,
            EquipmentCategory::Other => Self::Other,
        }
    }
}

impl From<ledger::EquipmentCategory> for EquipmentCategory {
    fn from(category: ledger::EquipmentCategory) -> Self {
        match category {
            ledger::EquipmentCategory::Weapon => Self::Weapon,
            ledger::EquipmentCategory::Vehicle => Self::Vehicle,
            ledger::EquipmentCategory::Ammunition => Self::Ammunition,
            ledger::EquipmentCategory::Communication => Self::Communication,
            ledger::EquipmentCategory::Other => Self::Other,
        }
    }
}

impl From<TransferStatus> for ledger::TransferStatus {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Pending => Self::Pending,
            TransferStatus::InTransit => Self::InTransit,
            TransferStatus::Completed => Self::Completed,
            TransferStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ledger::TransferStatus> for TransferStatus {
    fn from(status: ledger::TransferStatus) -> Self {
        match status {
            ledger::TransferStatus::Pending => Self::Pending,
            ledger::TransferStatus::InTransit => Self::InTransit,
            ledger::TransferStatus::Completed => Self::Completed,
            ledger::TransferStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<AssignmentStatus> for ledger::AssignmentStatus {
    fn from(status: AssignmentStatus) -> Self {
        match status {
            AssignmentStatus::Active => Self::Active,
            AssignmentStatus::Returned => Self::Returned,
            AssignmentStatus::Expended => Self::Expended,
        }
    }
}

impl From<ledger::AssignmentStatus> for AssignmentStatus {
    fn from(status: ledger::AssignmentStatus) -> Self {
        match status {
            ledger::AssignmentStatus::Active => Self::Active,
            ledger::AssignmentStatus::Returned => Self::Returned,
            ledger::AssignmentStatus::Expended => Self::Expended,
        }
    }
}

//! Role hierarchy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roles a user can hold.
///
/// Variants are declared from least to most privileged, so the derived
/// ordering is the privilege ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Records and views purchases and transfers at their home base.
    LogisticsOfficer,
    /// Everything a logistics officer can do, plus assignments and expenditures.
    BaseCommander,
    /// Unrestricted across all bases.
    Admin,
}

impl Role {
    /// All roles, least privileged first.
    pub const ALL: [Self; 3] = [Self::LogisticsOfficer, Self::BaseCommander, Self::Admin];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LogisticsOfficer => "logistics_officer",
            Self::BaseCommander => "base_commander",
            Self::Admin => "admin",
        }
    }

    /// Returns true if this role grants at least the privileges of `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }

    /// Returns true for the role that bypasses base scoping.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Returns true if `actual` grants at least the privileges of `required`.
#[must_use]
pub fn role_satisfies(actual: Role, required: Role) -> bool {
    actual.satisfies(required)
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role name that is not part of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logistics_officer" => Ok(Self::LogisticsOfficer),
            "base_commander" => Ok(Self::BaseCommander),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

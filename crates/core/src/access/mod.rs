//! Access control gate.
//!
//! Decides whether an authenticated principal may perform an action against
//! a base. Two rules apply, in order:
//!
//! 1. The principal's role must satisfy the role the action requires, where
//!    `admin` ⊇ `base_commander` ⊇ `logistics_officer`.
//! 2. Non-admin principals may only touch their own home base.
//!
//! The gate is a pure function of its inputs. It never reads storage, so a
//! denial can be issued before any balance or ledger query runs.

mod error;
mod gate;
mod role;

#[cfg(test)]
mod gate_props;

pub use error::AccessError;
pub use gate::{AccessGate, Action, Decision, DenyReason, Principal};
pub use role::{Role, UnknownRole, role_satisfies};

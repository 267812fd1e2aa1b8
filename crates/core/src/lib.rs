//! Core business logic for Garrison.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, authorization rules, and balance calculations live here.
//!
//! # Modules
//!
//! - `access` - Role hierarchy and base-scoped authorization gate
//! - `balance` - Opening/closing balance and movement aggregation
//! - `ledger` - Purchase, transfer and assignment record rules
//! - `auth` - Password hashing

pub mod access;
pub mod auth;
pub mod balance;
pub mod ledger;

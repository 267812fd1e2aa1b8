//! Credential handling.
//!
//! Roles live in [`crate::access`]; this module only deals with passwords.

mod password;

pub use password::{PasswordError, hash_password, verify_credentials, verify_password};

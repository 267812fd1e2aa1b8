//! Access control errors.

use thiserror::Error;

use super::gate::DenyReason;

/// Errors raised by the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The principal may not perform the request.
    #[error("forbidden: {0}")]
    Forbidden(DenyReason),
}

impl AccessError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
        }
    }

    /// Returns the underlying deny reason.
    #[must_use]
    pub const fn reason(&self) -> DenyReason {
        match self {
            Self::Forbidden(reason) => *reason,
        }
    }
}

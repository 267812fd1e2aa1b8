//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use garrison_core::access::AccessError;
use garrison_core::auth::PasswordError;
use garrison_core::balance::{BalanceError, LedgerReadError};
use garrison_core::ledger::LedgerRecordError;
use garrison_shared::{AppError, JwtError};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every handler.
///
/// Renders as `{"error": "<CODE>", "message": "..."}`. Messages of
/// server-side failures are replaced with a generic one.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Returns the wrapped error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }

    /// Shorthand for a 404.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self(AppError::NotFound(what.into()))
    }

    /// Shorthand for a 400.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self(AppError::InvalidArgument(message.into()))
    }

    /// Shorthand for a 409.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self(AppError::Conflict(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if self.0.is_client_safe() {
            self.0.to_string()
        } else {
            "An internal error occurred".to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self(AppError::Forbidden(err.reason().to_string()))
    }
}

impl From<BalanceError> for ApiError {
    fn from(err: BalanceError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            404 => Self(AppError::NotFound(message)),
            // The ledger reader has already logged the failure
            503 => Self(AppError::Unavailable(message)),
            _ => Self(AppError::InvalidArgument(message)),
        }
    }
}

impl From<LedgerReadError> for ApiError {
    fn from(err: LedgerReadError) -> Self {
        Self(AppError::Unavailable(err.to_string()))
    }
}

impl From<LedgerRecordError> for ApiError {
    fn from(err: LedgerRecordError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            409 => Self(AppError::Conflict(message)),
            422 => Self(AppError::BusinessRule(message)),
            _ => Self(AppError::InvalidArgument(message)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        error!(error = %err, "Password hashing failed");
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self(AppError::Unauthorized("token has expired".to_string())),
            JwtError::DecodingError(_) => {
                Self(AppError::Unauthorized("invalid or malformed token".to_string()))
            }
            JwtError::EncodingError(_) => {
                error!(error = %err, "Token generation failed");
                Self(AppError::Internal(err.to_string()))
            }
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                warn!(detail = %detail, "Unique constraint violated");
                Self(AppError::Conflict("a record with these values already exists".to_string()))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                warn!(detail = %detail, "Foreign key constraint violated");
                Self(AppError::InvalidArgument(
                    "a referenced record does not exist".to_string(),
                ))
            }
            _ => {
                error!(error = %err, "Database error");
                Self(AppError::Unavailable(err.to_string()))
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::InvalidArgument(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::InvalidArgument(rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::InvalidArgument(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garrison_core::access::{DenyReason, Role};
    use garrison_core::ledger::TransferStatus;
    use garrison_shared::types::BaseId;
    use rstest::rstest;

    #[test]
    fn test_access_denial_is_forbidden() {
        let err = ApiError::from(AccessError::Forbidden(DenyReason::InsufficientRole {
            required: Role::Admin,
            actual: Role::LogisticsOfficer,
        }));
        assert_eq!(err.inner().status_code(), 403);
    }

    #[rstest]
    #[case(BalanceError::BaseNotFound(BaseId::new()), 404)]
    #[case(BalanceError::BaseInactive(BaseId::new()), 400)]
    #[case(BalanceError::MalformedDate("x".into()), 400)]
    #[case(BalanceError::LedgerUnavailable(LedgerReadError::new("down")), 503)]
    fn test_balance_error_status(#[case] err: BalanceError, #[case] status: u16) {
        assert_eq!(ApiError::from(err).inner().status_code(), status);
    }

    #[rstest]
    #[case(LedgerRecordError::NonPositiveQuantity(0), 400)]
    #[case(LedgerRecordError::InvalidInitialTransferStatus(TransferStatus::Cancelled), 422)]
    #[case(
        LedgerRecordError::InvalidTransferTransition {
            from: TransferStatus::Completed,
            to: TransferStatus::Pending,
        },
        409
    )]
    fn test_record_error_status(#[case] err: LedgerRecordError, #[case] status: u16) {
        assert_eq!(ApiError::from(err).inner().status_code(), status);
    }

    #[test]
    fn test_connection_error_is_unavailable() {
        let err = ApiError::from(DbErr::Conn(sea_orm::RuntimeErr::Internal("refused".into())));
        assert_eq!(err.inner().status_code(), 503);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ledger_failures_are_not_logged_again() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let read = ApiError::from(LedgerReadError::new("down"));
            let balance =
                ApiError::from(BalanceError::LedgerUnavailable(LedgerReadError::new("down")));
            assert_eq!(read.inner().status_code(), 503);
            assert_eq!(balance.inner().status_code(), 503);
        });

        let output = captured.0.lock().unwrap();
        assert!(output.is_empty(), "{}", String::from_utf8_lossy(&output));
    }

    #[test]
    fn test_jwt_expiry_is_unauthorized() {
        assert_eq!(ApiError::from(JwtError::Expired).inner().status_code(), 401);
    }
}

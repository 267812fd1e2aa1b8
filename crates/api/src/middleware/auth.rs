//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use garrison_core::access::{Principal, Role};
use garrison_shared::types::{BaseId, UserId};
use garrison_shared::{AppError, Claims};
use tracing::debug;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Turns validated claims into the principal the access gate works with.
///
/// Tokens naming a role this build does not know are rejected.
fn principal_from_claims(claims: &Claims) -> Result<Principal, ApiError> {
    let role: Role = claims.role.parse().map_err(|_| {
        ApiError::from(AppError::Unauthorized(
            "token carries an unknown role".to_string(),
        ))
    })?;

    Ok(Principal::new(
        UserId::from_uuid(claims.user_id()),
        role,
        claims.home_base_id().map(BaseId::from_uuid),
    ))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the resulting [`Principal`] in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::from(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    let principal = match state
        .jwt_service
        .validate_token(token)
        .map_err(ApiError::from)
        .and_then(|claims| principal_from_claims(&claims))
    {
        Ok(principal) => principal,
        Err(e) => {
            debug!(error = ?e.inner(), "Rejected bearer token");
            return e.into_response();
        }
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Extractor for the authenticated principal.
///
/// Only usable behind [`auth_middleware`]:
///
/// ```ignore
/// async fn handler(AuthUser(principal): AuthUser) -> impl IntoResponse {
///     let home = principal.home_base_id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Returns the user ID as a plain UUID for storage columns.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id.into_inner()
    }

    /// Returns the principal.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()).into())
    }
}

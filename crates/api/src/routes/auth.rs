//! Authentication routes: login and the caller's own principal.

use axum::{Json, Router, extract::State, routing::{get, post}};
use garrison_core::access::Role;
use garrison_core::auth::verify_credentials;
use garrison_db::UserRepository;
use garrison_shared::auth::{LoginRequest, LoginResponse, PrincipalInfo};
use garrison_shared::AppError;
use garrison_shared::types::BaseId;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::ApiJson, middleware::AuthUser};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Creates the auth routes that need a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// POST /auth/login - Authenticate a user and issue an access token.
///
/// Unknown usernames and wrong passwords get the same answer, and both pay
/// for one password hash.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.find_active_by_username(&payload.username).await?;

    let verified = verify_credentials(
        &payload.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;

    let Some(user) = user.filter(|_| verified) else {
        info!(username = %payload.username, "Failed login attempt");
        return Err(AppError::Unauthorized("Invalid username or password".to_string()).into());
    };

    let role = Role::from(user.role);
    let access_token =
        state
            .jwt_service
            .generate_access_token(user.id, role.as_str(), user.home_base_id)?;

    info!(user_id = %user.id, role = %role, "User logged in");

    Ok(Json(LoginResponse {
        user: PrincipalInfo {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: role.as_str().to_string(),
            home_base_id: user.home_base_id,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// Principal snapshot carried by the caller's token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User ID.
    pub user_id: Uuid,
    /// Role.
    pub role: Role,
    /// Home base, absent for admins.
    pub home_base_id: Option<Uuid>,
}

/// GET /me - Return the authenticated principal.
async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id(),
        role: auth.0.role,
        home_base_id: auth.0.home_base_id.map(BaseId::into_inner),
    })
}

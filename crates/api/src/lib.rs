//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Request extractors
//! - The error type every handler returns

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use axum::Router;
use garrison_core::balance::LedgerReader;
use garrison_db::LedgerRepository;
use garrison_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Read side of the ledger used by the balance engine and write checks.
    pub ledger: Arc<dyn LedgerReader>,
}

impl AppState {
    /// Builds state whose ledger reads go to the same database.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService) -> Self {
        let ledger = Arc::new(LedgerRepository::new(db.clone()));
        Self::with_ledger(db, jwt_service, ledger)
    }

    /// Builds state with an explicit ledger reader.
    #[must_use]
    pub fn with_ledger(
        db: DatabaseConnection,
        jwt_service: JwtService,
        ledger: Arc<dyn LedgerReader>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            ledger,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

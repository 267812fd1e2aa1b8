//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! The database handle is disconnected: any handler that reaches storage
//! answers 503, which makes "rejected before storage" observable. Ledger
//! reads go to an in-memory ledger.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use garrison_api::{AppState, create_router};
use garrison_core::balance::InMemoryLedger;
use garrison_core::ledger::{AssignmentStatus, EquipmentCategory, TransferStatus};
use garrison_db::entities::{assignments, sea_orm_active_enums, transfers};
use garrison_shared::types::{BaseId, EquipmentTypeId};
use garrison_shared::{JwtConfig, JwtService};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "api-test-secret";

struct World {
    router: Router,
    ledger: Arc<InMemoryLedger>,
    jwt: JwtService,
    alpha: BaseId,
    bravo: BaseId,
    charlie: BaseId,
    rifle: EquipmentTypeId,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_minutes: 15,
    })
}

fn world_with(ledger: InMemoryLedger, ids: (BaseId, BaseId, BaseId, EquipmentTypeId)) -> World {
    world_on(DatabaseConnection::Disconnected, ledger, ids)
}

fn world_on(
    db: DatabaseConnection,
    ledger: InMemoryLedger,
    ids: (BaseId, BaseId, BaseId, EquipmentTypeId),
) -> World {
    let ledger = Arc::new(ledger);
    let state = AppState::with_ledger(db, jwt(), ledger.clone());

    World {
        router: create_router(state),
        ledger,
        jwt: jwt(),
        alpha: ids.0,
        bravo: ids.1,
        charlie: ids.2,
        rifle: ids.3,
    }
}

/// Alpha: 100 rifles before January; in January +20 bought, +5 received,
/// -10 sent, 3 expended, 4 on assignment. Charlie is deactivated.
fn world() -> World {
    world_backed_by(DatabaseConnection::Disconnected)
}

fn world_backed_by(db: DatabaseConnection) -> World {
    let alpha = BaseId::new();
    let bravo = BaseId::new();
    let charlie = BaseId::new();
    let rifle = EquipmentTypeId::new();

    let ledger = InMemoryLedger::new()
        .with_base(alpha, "Alpha", true)
        .with_base(bravo, "Bravo", true)
        .with_base(charlie, "Charlie", false)
        .with_equipment_type(rifle, "M4 Carbine", EquipmentCategory::Weapon)
        .purchase(alpha, rifle, 100, date(2023, 12, 1))
        .purchase(alpha, rifle, 20, date(2024, 1, 5))
        .transfer(bravo, alpha, rifle, 5, date(2024, 1, 8), TransferStatus::Completed)
        .transfer(alpha, bravo, rifle, 10, date(2024, 1, 12), TransferStatus::Completed)
        .transfer(bravo, alpha, rifle, 50, date(2024, 1, 14), TransferStatus::InTransit)
        .assignment(alpha, rifle, 3, date(2024, 1, 20), AssignmentStatus::Expended)
        .assignment(alpha, rifle, 4, date(2024, 1, 22), AssignmentStatus::Active);

    world_on(db, ledger, (alpha, bravo, charlie, rifle))
}

impl World {
    fn token(&self, role: &str, base: Option<BaseId>) -> String {
        self.jwt
            .generate_access_token(Uuid::new_v4(), role, base.map(BaseId::into_inner))
            .unwrap()
    }

    fn admin(&self) -> String {
        self.token("admin", None)
    }

    fn officer(&self, base: BaseId) -> String {
        self.token("logistics_officer", Some(base))
    }

    fn commander(&self, base: BaseId) -> String {
        self.token("base_commander", Some(base))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn write(&self, method: &str, uri: &str, token: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

fn metrics_uri(base: Option<BaseId>) -> String {
    let mut uri = "/api/v1/dashboard/metrics?start_date=2024-01-01&end_date=2024-01-31".to_string();
    if let Some(base) = base {
        uri.push_str(&format!("&base_id={base}"));
    }
    uri
}

// ============================================================================
// Public routes
// ============================================================================

#[tokio::test]
async fn test_health_reports_version_and_database() {
    let w = world();
    let (status, body) = w.get("/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["database"], false);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_login_storage_failure_is_unavailable() {
    let w = world();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"username": "ops", "password": "x"}).to_string()))
        .unwrap();

    let (status, body) = w.send(request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "UNAVAILABLE");
    assert_eq!(body["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let w = world();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username": "ops"}"#))
        .unwrap();

    let (status, body) = w.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let w = world();
    let (status, body) = w.get(&metrics_uri(Some(w.alpha)), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(w.ledger.read_count(), 0);
}

#[tokio::test]
async fn test_token_from_other_secret_is_unauthorized() {
    let w = world();
    let forged = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        access_token_expires_minutes: 15,
    })
    .generate_access_token(Uuid::new_v4(), "admin", None)
    .unwrap();

    let (status, _) = w.get("/api/v1/me", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_principal() {
    let w = world();
    let (status, body) = w.get("/api/v1/me", Some(&w.commander(w.bravo))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "base_commander");
    assert_eq!(body["home_base_id"], w.bravo.to_string());
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_officer_sees_home_base_metrics() {
    let w = world();
    let uri = format!("{}&equipment_type_id={}", metrics_uri(None), w.rifle);

    let (status, body) = w.get(&uri, Some(&w.officer(w.alpha))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base_id"], w.alpha.to_string());
    assert_eq!(body["base_name"], "Alpha");
    assert_eq!(body["start_date"], "2024-01-01");
    assert_eq!(body["opening_balance"], 100);
    assert_eq!(body["purchases"], 20);
    assert_eq!(body["transfers_in"], 5);
    assert_eq!(body["transfers_out"], 10);
    assert_eq!(body["expended"], 3);
    assert_eq!(body["assigned"], 4);
    assert_eq!(body["net_movement"], 15);
    assert_eq!(body["closing_balance"], 112);
    assert_eq!(body["percent_change"], json!(12.0));
    assert_eq!(body["by_equipment_type"][0]["equipment_type_name"], "M4 Carbine");
}

#[tokio::test]
async fn test_commander_denied_other_base_before_any_read() {
    let w = world();
    let (status, body) = w
        .get(&metrics_uri(Some(w.alpha)), Some(&w.commander(w.bravo)))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(w.ledger.read_count(), 0);
}

#[tokio::test]
async fn test_admin_without_base_gets_every_active_base() {
    let w = world();
    let (status, body) = w.get(&metrics_uri(None), Some(&w.admin())).await;

    assert_eq!(status, StatusCode::OK);
    let reports = body.as_array().unwrap();
    let names: Vec<&str> = reports
        .iter()
        .map(|r| r["base_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);

    // Completed transfers conserve units across the two bases.
    assert_eq!(reports[0]["transfers_in"], reports[1]["transfers_out"]);
    assert_eq!(reports[0]["transfers_out"], reports[1]["transfers_in"]);
}

#[tokio::test]
async fn test_admin_with_base_gets_single_report() {
    let w = world();
    let (status, body) = w
        .get(&metrics_uri(Some(w.bravo)), Some(&w.admin()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object());
    assert_eq!(body["base_name"], "Bravo");
    assert_eq!(body["opening_balance"], 0);
    assert_eq!(body["closing_balance"], 5);
    assert_eq!(body["percent_change"], json!(0.0));
}

#[rstest]
#[case("start_date=2024-13-01&end_date=2024-01-31")]
#[case("start_date=2024-02-01&end_date=2024-01-01")]
#[case("start_date=yesterday&end_date=2024-01-31")]
#[case("end_date=2024-01-31")]
#[tokio::test]
async fn test_bad_dates_are_invalid_argument(#[case] query: &str) {
    let w = world();
    let uri = format!("/api/v1/dashboard/metrics?{query}");

    let (status, body) = w.get(&uri, Some(&w.officer(w.alpha))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_inactive_base_is_invalid_argument() {
    let w = world();
    let (status, body) = w
        .get(&metrics_uri(Some(w.charlie)), Some(&w.admin()))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_unknown_base_is_not_found() {
    let w = world();
    let (status, _) = w
        .get(&metrics_uri(Some(BaseId::new())), Some(&w.admin()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ledger_failure_is_unavailable() {
    let ids = (BaseId::new(), BaseId::new(), BaseId::new(), EquipmentTypeId::new());
    let w = world_with(InMemoryLedger::new().failing("connection reset"), ids);

    let (status, body) = w.get(&metrics_uri(Some(w.alpha)), Some(&w.admin())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "UNAVAILABLE");
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_officer_cannot_create_base() {
    let w = world();
    let (status, body) = w
        .write(
            "POST",
            "/api/v1/bases",
            &w.officer(w.alpha),
            &json!({"name": "Delta", "location": "North"}),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_purchase_for_foreign_base_is_forbidden() {
    let w = world();
    let (status, _) = w
        .write(
            "POST",
            "/api/v1/purchases",
            &w.officer(w.alpha),
            &json!({
                "base_id": w.bravo,
                "equipment_type_id": w.rifle,
                "quantity": 5,
                "unit_cost": "100.00",
                "purchase_date": "2024-02-01"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(w.ledger.read_count(), 0);
}

#[tokio::test]
async fn test_purchase_with_zero_quantity_is_rejected() {
    let w = world();
    let (status, body) = w
        .write(
            "POST",
            "/api/v1/purchases",
            &w.officer(w.alpha),
            &json!({
                "equipment_type_id": w.rifle,
                "quantity": 0,
                "unit_cost": "100.00",
                "purchase_date": "2024-02-01"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_purchase_for_inactive_base_is_rejected() {
    let w = world();
    let (status, _) = w
        .write(
            "POST",
            "/api/v1/purchases",
            &w.admin(),
            &json!({
                "base_id": w.charlie,
                "equipment_type_id": w.rifle,
                "quantity": 1,
                "unit_cost": "10",
                "purchase_date": "2024-02-01"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_purchase_needs_base() {
    let w = world();
    let (status, body) = w
        .write(
            "POST",
            "/api/v1/purchases",
            &w.admin(),
            &json!({
                "equipment_type_id": w.rifle,
                "quantity": 1,
                "unit_cost": "10",
                "purchase_date": "2024-02-01"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_transfer_to_same_base_is_rejected() {
    let w = world();
    let (status, _) = w
        .write(
            "POST",
            "/api/v1/transfers",
            &w.officer(w.alpha),
            &json!({
                "destination_base_id": w.alpha,
                "equipment_type_id": w.rifle,
                "quantity": 2,
                "transfer_date": "2024-02-01"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transfer_cannot_start_cancelled() {
    let w = world();
    let (status, body) = w
        .write(
            "POST",
            "/api/v1/transfers",
            &w.officer(w.alpha),
            &json!({
                "destination_base_id": w.bravo,
                "equipment_type_id": w.rifle,
                "quantity": 2,
                "transfer_date": "2024-02-01",
                "status": "cancelled"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
}

#[tokio::test]
async fn test_officer_cannot_touch_assignments() {
    let w = world();
    let token = w.officer(w.alpha);

    let (status, _) = w.get("/api/v1/assignments", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/assignments/{}/status", Uuid::new_v4());
    let (status, _) = w
        .write("PATCH", &uri, &token, &json!({"status": "returned"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_admin_cannot_list_all_bases_explicitly() {
    let w = world();
    let uri = format!("/api/v1/purchases?base_id={}", w.bravo);

    let (status, _) = w.get(&uri, Some(&w.officer(w.alpha))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_path_id_is_invalid_argument() {
    let w = world();
    let (status, body) = w
        .write(
            "PATCH",
            "/api/v1/transfers/not-a-uuid/status",
            &w.admin(),
            &json!({"status": "completed"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

// ============================================================================
// Status changes against a mocked store
// ============================================================================

fn stored_assignment(
    base: BaseId,
    status: sea_orm_active_enums::AssignmentStatus,
    expended_on: Option<NaiveDate>,
) -> assignments::Model {
    let now = Utc::now().into();
    assignments::Model {
        id: Uuid::now_v7(),
        base_id: base.into_inner(),
        equipment_type_id: Uuid::now_v7(),
        quantity: 6,
        assignee: "Range training".to_string(),
        assignment_date: date(2024, 1, 25),
        status,
        expended_on,
        notes: None,
        created_by: Uuid::now_v7(),
        created_at: now,
        updated_at: now,
    }
}

fn stored_transfer(
    source: BaseId,
    destination: BaseId,
    status: sea_orm_active_enums::TransferStatus,
    completed_on: Option<NaiveDate>,
) -> transfers::Model {
    let now = Utc::now().into();
    transfers::Model {
        id: Uuid::now_v7(),
        source_base_id: source.into_inner(),
        destination_base_id: destination.into_inner(),
        equipment_type_id: Uuid::now_v7(),
        quantity: 50,
        transfer_date: date(2024, 1, 14),
        status,
        completed_on,
        notes: None,
        created_by: Uuid::now_v7(),
        created_at: now,
        updated_at: now,
    }
}

fn updated_once() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

#[tokio::test]
async fn test_expenditure_cannot_predate_assignment() {
    let home = BaseId::new();
    let active = stored_assignment(home, sea_orm_active_enums::AssignmentStatus::Active, None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![active.clone()]])
        .into_connection();
    let w = world_backed_by(db.clone());

    let uri = format!("/api/v1/assignments/{}/status", active.id);
    let (status, body) = w
        .write(
            "PATCH",
            &uri,
            &w.commander(home),
            &json!({"status": "expended", "effective_date": "2024-01-24"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
    // Only the lookup ran
    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_expenditure_defaults_to_today() {
    let home = BaseId::new();
    let today = Utc::now().date_naive();
    let active = stored_assignment(home, sea_orm_active_enums::AssignmentStatus::Active, None);
    let expended = assignments::Model {
        status: sea_orm_active_enums::AssignmentStatus::Expended,
        expended_on: Some(today),
        ..active.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![active.clone()], vec![expended]])
        .append_exec_results([updated_once()])
        .into_connection();
    let w = world_backed_by(db.clone());

    let uri = format!("/api/v1/assignments/{}/status", active.id);
    let (status, body) = w
        .write("PATCH", &uri, &w.commander(home), &json!({"status": "expended"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignment_date"], "2024-01-25");
    assert_eq!(body["expended_on"], today.to_string());

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains(&today.to_string()), "{log}");
}

#[tokio::test]
async fn test_completion_takes_requested_effective_date() {
    let pending = stored_transfer(
        BaseId::new(),
        BaseId::new(),
        sea_orm_active_enums::TransferStatus::InTransit,
        None,
    );
    let completed = transfers::Model {
        status: sea_orm_active_enums::TransferStatus::Completed,
        completed_on: Some(date(2024, 3, 2)),
        ..pending.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()], vec![completed]])
        .append_exec_results([updated_once()])
        .into_connection();
    let w = world_backed_by(db.clone());

    let uri = format!("/api/v1/transfers/{}/status", pending.id);
    let (status, body) = w
        .write(
            "PATCH",
            &uri,
            &w.admin(),
            &json!({"status": "completed", "effective_date": "2024-03-02"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transfer_date"], "2024-01-14");
    assert_eq!(body["completed_on"], "2024-03-02");

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("2024-03-02"), "{log}");
}

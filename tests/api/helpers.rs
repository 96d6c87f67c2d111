//! Shared test fixtures: a router over temp stores, seeded with one admin,
//! one super_admin, and one user, plus request helpers.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use subgate::config::Config;
use subgate::crypto;
use subgate::db::{AppState, open_pool, queries};
use subgate::handlers;
use subgate::kv::KvStore;
use subgate::models::{AdminRole, CreateUser};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const USER_EMAIL: &str = "user@example.com";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin_token: String,
    pub super_admin_token: String,
    pub super_admin_id: String,
    pub user_token: String,
    _dir: TempDir,
}

pub fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("subgate.db");
    let kv_path = dir.path().join("subgate_kv.db");

    let state = AppState {
        db: open_pool(db_path.to_str().unwrap()).unwrap(),
        kv: KvStore::open(kv_path.to_str().unwrap()).unwrap(),
        dev_mode: false,
    };

    let conn = state.db.get().unwrap();

    let admin = queries::create_admin(
        &conn,
        ADMIN_EMAIL,
        "Admin",
        &crypto::hash_password(ADMIN_PASSWORD),
        AdminRole::Admin,
    )
    .unwrap();
    let admin_token = crypto::generate_token("sess");
    queries::create_admin_session(&conn, &admin.id, &crypto::hash_secret(&admin_token)).unwrap();

    let super_admin = queries::create_admin(
        &conn,
        "root@example.com",
        "Root",
        &crypto::hash_password("root-password-123"),
        AdminRole::SuperAdmin,
    )
    .unwrap();
    let super_admin_token = crypto::generate_token("sess");
    queries::create_admin_session(
        &conn,
        &super_admin.id,
        &crypto::hash_secret(&super_admin_token),
    )
    .unwrap();

    let user_token = crypto::generate_token("ut");
    queries::create_user(
        &conn,
        &CreateUser {
            email: USER_EMAIL.to_string(),
            name: "Test User".to_string(),
        },
        Some(&crypto::hash_secret(&user_token)),
    )
    .unwrap();
    drop(conn);

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: db_path.to_str().unwrap().to_string(),
        kv_database_path: kv_path.to_str().unwrap().to_string(),
        dev_mode: false,
        bootstrap_admin_email: None,
        bootstrap_admin_password: None,
        request_timeout_secs: 5,
    };

    TestApp {
        router: handlers::router(state.clone(), &config),
        state,
        admin_token,
        super_admin_token,
        super_admin_id: super_admin.id,
        user_token,
        _dir: dir,
    }
}

async fn send(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn post_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(router, "POST", path, token, Some(body)).await
}

pub async fn get(
    router: &Router,
    path: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    send(router, "GET", path, token, None).await
}

/// Submit a pending receipt as the seeded user and return its id.
pub async fn submit_receipt(app: &TestApp, plan: &str, amount: &str) -> String {
    let (status, body) = post_json(
        &app.router,
        "/upload-receipt",
        Some(&app.user_token),
        serde_json::json!({
            "fileName": "r.png",
            "fileData": "iVBORw0KGgoAAAANSUhEUg==",
            "plan": plan,
            "amount": amount,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {body}");
    body["receiptId"].as_str().unwrap().to_string()
}

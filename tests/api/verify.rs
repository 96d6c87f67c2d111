//! Verification endpoint contract: reason codes, status codes, idempotency,
//! and the documented active-past-expiry behavior.

use axum::http::StatusCode;
use serde_json::json;

use subgate::codes::looks_like_code;
use subgate::db::queries;
use subgate::models::{Subscription, SubscriptionStatus};

use crate::helpers::{get, post_json, test_app};

#[tokio::test]
async fn missing_code_is_reported_not_fatal() {
    let app = test_app();

    for body in [json!({}), json!({ "code": "" }), json!({ "code": "   " })] {
        let (status, response) = post_json(&app.router, "/verify", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["ok"], false);
        assert_eq!(response["reason"], "missing_code");
    }
}

#[tokio::test]
async fn unknown_code_is_invalid_and_idempotent() {
    let app = test_app();

    for _ in 0..5 {
        let (status, response) =
            post_json(&app.router, "/verify", None, json!({ "code": "AC-NOEXIST" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["ok"], false);
        assert_eq!(response["reason"], "invalid_code");
    }
}

#[tokio::test]
async fn malformed_body_counts_as_missing_code() {
    let app = test_app();
    let (status, response) = post_json(&app.router, "/verify", None, json!("not an object")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["reason"], "missing_code");
}

#[tokio::test]
async fn manual_subscription_verifies_with_plan_and_expiry() {
    let app = test_app();

    // Duration arrives as a string, the way the admin form posts it.
    let before = chrono::Utc::now().timestamp();
    let (status, created) = post_json(
        &app.router,
        "/admin/create-subscription",
        Some(&app.admin_token),
        json!({ "plan": "basic", "duration": "90" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {created}");
    let code = created["activation_code"].as_str().unwrap();
    assert!(looks_like_code(code), "unexpected code: {code}");

    let expires_at = created["subscription"]["expires_at"].as_i64().unwrap();
    assert!(expires_at >= before + 90 * 86400);
    assert!(expires_at <= chrono::Utc::now().timestamp() + 90 * 86400);

    let (status, verified) = post_json(&app.router, "/verify", None, json!({ "code": code })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["ok"], true);
    assert_eq!(verified["plan"], "basic");
    assert_eq!(verified["expires_at"], expires_at);
    assert!(verified.get("reason").is_none());
}

#[tokio::test]
async fn non_active_status_is_inactive_subscription() {
    let app = test_app();

    let conn = app.state.db.get().unwrap();
    let sub = Subscription {
        id: "sub-1".to_string(),
        activation_code: "AC-TESTTEST-1".to_string(),
        plan: "premium".to_string(),
        status: SubscriptionStatus::Expired,
        expires_at: chrono::Utc::now().timestamp() + 86400,
        created_at: chrono::Utc::now().timestamp(),
        user_email: None,
    };
    queries::insert_subscription(&conn, &sub).unwrap();

    let (status, response) = post_json(
        &app.router,
        "/verify",
        None,
        json!({ "code": "AC-TESTTEST-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["ok"], false);
    assert_eq!(response["reason"], "inactive_subscription");
}

// Documented behavior: verification does not compare expires_at against the
// clock, so an active row past its expiry still verifies.
#[tokio::test]
async fn active_but_expired_row_still_verifies() {
    let app = test_app();

    let conn = app.state.db.get().unwrap();
    let sub = Subscription {
        id: "sub-2".to_string(),
        activation_code: "AC-OLDOLD00-1".to_string(),
        plan: "standard".to_string(),
        status: SubscriptionStatus::Active,
        expires_at: chrono::Utc::now().timestamp() - 86400,
        created_at: chrono::Utc::now().timestamp() - 40 * 86400,
        user_email: None,
    };
    queries::insert_subscription(&conn, &sub).unwrap();

    let (status, response) = post_json(
        &app.router,
        "/verify",
        None,
        json!({ "code": "AC-OLDOLD00-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ok"], true);
    assert_eq!(response["plan"], "standard");
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = test_app();
    let (status, body) = get(&app.router, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

//! Admin session guard: login contract, session tokens, role gating, and
//! the manual subscription surface.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN_EMAIL, ADMIN_PASSWORD, get, post_json, test_app};

#[tokio::test]
async fn login_returns_a_working_session_token() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["admin"]["email"], ADMIN_EMAIL);
    assert_eq!(body["admin"]["role"], "admin");
    assert!(body["admin"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = get(&app.router, "/admin/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["admin"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn login_normalizes_the_email() {
    let app = test_app();
    let (status, _) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": "  Admin@Example.COM ", "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_do_not_leak_account_existence() {
    let app = test_app();

    let (wrong_pw_status, wrong_pw) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
    )
    .await;
    let (no_account_status, no_account) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": "ghost@example.com", "password": "wrong" }),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_account_status, StatusCode::UNAUTHORIZED);
    // Identical bodies for wrong password and unknown email.
    assert_eq!(wrong_pw, no_account);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = test_app();
    for body in [
        json!({}),
        json!({ "email": ADMIN_EMAIL }),
        json!({ "password": "x" }),
    ] {
        let (status, _) = post_json(&app.router, "/admin/login", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = test_app();

    let (_, body) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = post_json(&app.router, "/admin/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app.router, "/admin/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_missing_or_user_tokens() {
    let app = test_app();

    let (status, _) = get(&app.router, "/admin/subscriptions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A user token is not an admin session.
    let (status, _) = get(&app.router, "/admin/subscriptions", Some(&app.user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_subscription_validates_fields() {
    let app = test_app();

    for body in [
        json!({ "duration": "30" }),
        json!({ "plan": "basic" }),
        json!({ "plan": "basic", "duration": "not-a-number" }),
        json!({ "plan": "basic", "duration": 0 }),
        json!({ "plan": "basic", "duration": i64::MAX }),
        json!({ "plan": "", "duration": 30 }),
    ] {
        let (status, response) = post_json(
            &app.router,
            "/admin/create-subscription",
            Some(&app.admin_token),
            body,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted: {response}");
    }
}

#[tokio::test]
async fn manual_grant_updates_the_matching_user_row() {
    let app = test_app();

    let (status, created) = post_json(
        &app.router,
        "/admin/create-subscription",
        Some(&app.admin_token),
        json!({ "email": crate::helpers::USER_EMAIL, "plan": "standard", "duration": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let code = created["activation_code"].as_str().unwrap();

    let conn = app.state.db.get().unwrap();
    let user = subgate::db::queries::get_user_by_email(&conn, crate::helpers::USER_EMAIL)
        .unwrap()
        .unwrap();
    assert_eq!(user.subscription_plan.as_deref(), Some("standard"));
    assert_eq!(user.activation_code.as_deref(), Some(code));
}

#[tokio::test]
async fn subscriptions_list_is_newest_first() {
    let app = test_app();

    for plan in ["basic", "standard"] {
        let (status, _) = post_json(
            &app.router,
            "/admin/create-subscription",
            Some(&app.admin_token),
            json!({ "plan": plan, "duration": 30 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get(&app.router, "/admin/subscriptions", Some(&app.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let subs = body["subscriptions"].as_array().unwrap();
    assert_eq!(subs.len(), 2);
    let first = subs[0]["created_at"].as_i64().unwrap();
    let second = subs[1]["created_at"].as_i64().unwrap();
    assert!(first >= second);
}

#[tokio::test]
async fn admin_management_requires_super_admin() {
    let app = test_app();

    let new_admin = json!({
        "email": "second@example.com",
        "name": "Second",
        "password": "long-enough-pass",
    });

    let (status, _) = post_json(
        &app.router,
        "/admin/admins",
        Some(&app.admin_token),
        new_admin.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = post_json(
        &app.router,
        "/admin/admins",
        Some(&app.super_admin_token),
        new_admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {created}");
    assert_eq!(created["admin"]["role"], "admin");

    // Duplicate email is rejected.
    let (status, _) = post_json(
        &app.router,
        "/admin/admins",
        Some(&app.super_admin_token),
        json!({ "email": "second@example.com", "name": "Dup", "password": "long-enough-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listing) = get(&app.router, "/admin/admins", Some(&app.super_admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["admins"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn deactivation_locks_the_account_out_immediately() {
    let app = test_app();

    let (_, created) = post_json(
        &app.router,
        "/admin/admins",
        Some(&app.super_admin_token),
        json!({ "email": "victim@example.com", "name": "Victim", "password": "long-enough-pass" }),
    )
    .await;
    let id = created["admin"]["id"].as_str().unwrap();

    // The account logs in, then gets deactivated.
    let (_, login) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": "victim@example.com", "password": "long-enough-pass" }),
    )
    .await;
    let victim_token = login["token"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        &app.router,
        &format!("/admin/admins/{id}/deactivate"),
        Some(&app.super_admin_token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Existing session is gone, and re-login fails with the generic 401.
    let (status, _) = get(&app.router, "/admin/me", Some(&victim_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_json(
        &app.router,
        "/admin/login",
        None,
        json!({ "email": "victim@example.com", "password": "long-enough-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn super_admin_cannot_deactivate_itself() {
    let app = test_app();
    let (status, _) = post_json(
        &app.router,
        &format!("/admin/admins/{}/deactivate", app.super_admin_id),
        Some(&app.super_admin_token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

//! Activation code verification for external automated callers.
//!
//! The caller branches on the `reason` field, so every outcome (including
//! a store failure) is reported as a structured body, never as the generic
//! `{"error": ...}` shape.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::models::SubscriptionStatus;
use crate::registry;

#[derive(Debug, Default, Deserialize)]
struct VerifyRequest {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

fn failure(status: StatusCode, reason: &'static str) -> (StatusCode, VerifyResponse) {
    (
        status,
        VerifyResponse {
            ok: false,
            reason: Some(reason),
            plan: None,
            expires_at: None,
        },
    )
}

/// POST /verify. Idempotent, no mutation, safe to call concurrently.
pub async fn verify_code(State(state): State<AppState>, body: Bytes) -> Response {
    // A missing or malformed body is treated the same as a missing code;
    // this endpoint never returns the generic error shape.
    let request: VerifyRequest = serde_json::from_slice(&body).unwrap_or_default();

    let (status, response) = match lookup(&state, request.code.as_deref()) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("verify lookup failed: {err}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "server_error")
        }
    };

    (status, axum::Json(response)).into_response()
}

fn lookup(state: &AppState, code: Option<&str>) -> Result<(StatusCode, VerifyResponse)> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(failure(StatusCode::BAD_REQUEST, "missing_code"));
    };

    let conn = state.db.get()?;
    let Some(subscription) = registry::find_by_code(&conn, code)? else {
        return Ok(failure(StatusCode::NOT_FOUND, "invalid_code"));
    };

    if subscription.status != SubscriptionStatus::Active {
        return Ok(failure(StatusCode::FORBIDDEN, "inactive_subscription"));
    }

    // Deliberately no clock comparison against expires_at: an active row
    // verifies even past expiry. Callers get expires_at and can decide.
    Ok((
        StatusCode::OK,
        VerifyResponse {
            ok: true,
            reason: None,
            plan: Some(subscription.plan),
            expires_at: Some(subscription.expires_at),
        },
    ))
}

use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::crypto;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::middleware::AdminContext;
use crate::models::AdminProfile;
use crate::util::extract_bearer_token;

// Verified when the email is unknown so lookup misses cost the same as
// password mismatches.
const DUMMY_HASH: &str =
    "0000000000000000$0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub admin: AdminProfile,
}

/// POST /admin/login.
///
/// Unknown email, wrong password, and deactivated account all return the
/// same 401 so the response never reveals which emails are registered.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return Err(AppError::Validation("Missing email or password".into()));
    };
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation("Missing email or password".into()));
    }

    let conn = state.db.get()?;
    let invalid = || AppError::Auth("Invalid credentials".into());

    let admin = match queries::get_admin_by_email(&conn, email)? {
        Some(a) if crypto::verify_password(password, &a.password_hash) && a.is_active => a,
        Some(_) => return Err(invalid()),
        None => {
            crypto::verify_password(password, DUMMY_HASH);
            return Err(invalid());
        }
    };

    queries::touch_admin_last_login(&conn, &admin.id)?;

    let token = crypto::generate_token("sess");
    queries::create_admin_session(&conn, &admin.id, &crypto::hash_secret(&token))?;

    tracing::info!("admin {} logged in", admin.id);

    Ok(Json(LoginResponse {
        success: true,
        token,
        admin: AdminProfile::from(&admin),
    }))
}

/// POST /admin/logout. Deletes the presented session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if let Some(token) = extract_bearer_token(&headers) {
        queries::delete_session_by_token_hash(&conn, &crypto::hash_secret(token))?;
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Serialize)]
pub struct AdminMeResponse {
    pub success: bool,
    pub admin: AdminProfile,
}

pub async fn admin_me(Extension(ctx): Extension<AdminContext>) -> Result<Json<AdminMeResponse>> {
    Ok(Json(AdminMeResponse {
        success: true,
        admin: AdminProfile::from(&ctx.admin),
    }))
}

//! Admin session guard.
//!
//! Every privileged route re-verifies the bearer session token on each
//! request; nothing is trusted from the client beyond the token itself.
//! Sessions live server-side and persist until logout deletes them.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::crypto::hash_secret;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::{Admin, AdminRole};
use crate::util::extract_bearer_token;

#[derive(Clone)]
pub struct AdminContext {
    pub admin: Admin,
}

/// Authenticate an administrator from the bearer session token.
/// Missing token, unknown session, and deactivated account all yield the
/// same 401.
fn authenticate_admin(state: &AppState, headers: &HeaderMap) -> Result<Admin> {
    let unauthorized = || AppError::Auth("Unauthorized".into());

    let token = extract_bearer_token(headers).ok_or_else(unauthorized)?;
    let conn = state.db.get()?;

    let session =
        queries::get_session_by_token_hash(&conn, &hash_secret(token))?.ok_or_else(unauthorized)?;

    queries::get_admin_by_id(&conn, &session.admin_id)?
        .filter(|admin| admin.is_active)
        .ok_or_else(unauthorized)
}

pub async fn admin_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let admin = authenticate_admin(&state, request.headers())?;
    request.extensions_mut().insert(AdminContext { admin });
    Ok(next.run(request).await)
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let admin = authenticate_admin(&state, request.headers())?;
    if !matches!(admin.role, AdminRole::SuperAdmin) {
        return Err(AppError::Forbidden("Super admin access required".into()));
    }
    request.extensions_mut().insert(AdminContext { admin });
    Ok(next.run(request).await)
}

//! End-user authentication port.
//!
//! Account-holder identity is owned by an external provider; this layer
//! only resolves an opaque bearer token to a stored user row by token
//! digest. No password flow exists on this surface.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::crypto::hash_secret;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::util::extract_bearer_token;

#[derive(Clone)]
pub struct UserContext {
    pub user: User,
}

pub async fn user_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let unauthorized = || AppError::Auth("Unauthorized".into());

    let token = extract_bearer_token(request.headers()).ok_or_else(unauthorized)?;
    let conn = state.db.get()?;
    let user =
        queries::get_user_by_token_hash(&conn, &hash_secret(token))?.ok_or_else(unauthorized)?;

    request.extensions_mut().insert(UserContext { user });
    Ok(next.run(request).await)
}

//! Dev-mode-only helpers. Never mounted outside dev mode: end-user
//! identity normally comes from the external provider, so local testing
//! needs a way to mint a user with a usable bearer token.

use axum::extract::State;
use axum::{Router, routing::post};
use serde::Serialize;

use crate::crypto;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::CreateUser;

#[derive(Debug, Serialize)]
pub struct DevUserCreated {
    pub user_id: String,
    pub email: String,
    /// Bearer token for the new user. Shown once, stored only as a digest.
    pub token: String,
}

pub async fn create_dev_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<Json<DevUserCreated>> {
    if input.email.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    let conn = state.db.get()?;
    let token = crypto::generate_token("ut");
    let user = queries::create_user(&conn, &input, Some(&crypto::hash_secret(&token)))?;

    tracing::info!("DEV: created test user {} ({})", user.id, user.email);

    Ok(Json(DevUserCreated {
        user_id: user.id,
        email: user.email,
        token,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create-user", post(create_dev_user))
}

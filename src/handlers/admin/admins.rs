//! Administrator management, super_admin only. Accounts are deactivated,
//! never hard-deleted.

use axum::extract::{Extension, State};
use serde::Serialize;

use crate::crypto;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::middleware::AdminContext;
use crate::models::{AdminProfile, AdminRole, CreateAdmin};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Serialize)]
pub struct AdminCreated {
    pub success: bool,
    pub admin: AdminProfile,
}

pub async fn create_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Json(input): Json<CreateAdmin>,
) -> Result<Json<AdminCreated>> {
    if input.email.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let conn = state.db.get()?;
    let role = input.role.unwrap_or(AdminRole::Admin);
    let password_hash = crypto::hash_password(&input.password);

    // The email UNIQUE constraint is the authority on duplicates; a
    // pre-check read could miss a concurrent insert.
    let admin = match queries::create_admin(&conn, &input.email, &input.name, &password_hash, role)
    {
        Ok(admin) => admin,
        Err(AppError::Store(e)) if queries::is_unique_violation(&e) => {
            return Err(AppError::Validation("Email is already registered".into()));
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        "admin {} ({}) created by {}",
        admin.id,
        admin.role.as_ref(),
        ctx.admin.id
    );

    Ok(Json(AdminCreated {
        success: true,
        admin: AdminProfile::from(&admin),
    }))
}

#[derive(Serialize)]
pub struct AdminListEntry {
    #[serde(flatten)]
    pub profile: AdminProfile,
    pub is_active: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
}

#[derive(Serialize)]
pub struct AdminsResponse {
    pub success: bool,
    pub admins: Vec<AdminListEntry>,
}

pub async fn list_admins(State(state): State<AppState>) -> Result<Json<AdminsResponse>> {
    let conn = state.db.get()?;
    let admins = queries::list_admins(&conn)?
        .iter()
        .map(|a| AdminListEntry {
            profile: AdminProfile::from(a),
            is_active: a.is_active,
            created_at: a.created_at,
            last_login_at: a.last_login_at,
        })
        .collect();
    Ok(Json(AdminsResponse {
        success: true,
        admins,
    }))
}

pub async fn deactivate_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    if id == ctx.admin.id {
        return Err(AppError::Validation("Cannot deactivate yourself".into()));
    }

    let conn = state.db.get()?;
    if !queries::set_admin_active(&conn, &id, false)? {
        return Err(AppError::NotFound("Admin not found".into()));
    }

    tracing::info!("admin {} deactivated by {}", id, ctx.admin.id);

    Ok(Json(serde_json::json!({ "success": true })))
}

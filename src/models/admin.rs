use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
}

/// The session descriptor returned to the dashboard on login; never carries
/// credential material.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl From<&Admin> for AdminProfile {
    fn from(a: &Admin) -> Self {
        Self {
            id: a.id.clone(),
            email: a.email.clone(),
            name: a.name.clone(),
            role: a.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminSession {
    pub id: String,
    pub admin_id: String,
    pub token_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdmin {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<AdminRole>,
}

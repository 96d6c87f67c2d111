use chrono::Utc;
use rusqlite::{Connection, ErrorCode, params};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::util::normalize_email;

use super::from_row::{
    ADMIN_COLS, ADMIN_SESSION_COLS, SUBSCRIPTION_COLS, USER_COLS, query_all, query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// True when an insert bounced off a UNIQUE/PRIMARY KEY constraint. The
/// registry uses this to re-mint on an activation code collision.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

// ============ Subscriptions ============

/// Insert a subscription row. The activation code is the primary key, so a
/// duplicate code fails the insert rather than silently overwriting.
pub fn insert_subscription(conn: &Connection, sub: &Subscription) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO subscriptions (id, activation_code, plan, status, expires_at, created_at, user_email)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &sub.id,
            &sub.activation_code,
            &sub.plan,
            sub.status.as_ref(),
            sub.expires_at,
            sub.created_at,
            &sub.user_email,
        ],
    )?;
    Ok(())
}

pub fn find_subscription_by_code(conn: &Connection, code: &str) -> Result<Option<Subscription>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM subscriptions WHERE activation_code = ?1",
            SUBSCRIPTION_COLS
        ),
        &[&code],
    )
}

pub fn list_subscriptions(conn: &Connection) -> Result<Vec<Subscription>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM subscriptions ORDER BY created_at DESC",
            SUBSCRIPTION_COLS
        ),
        [],
    )
}

// ============ Admins ============

pub fn create_admin(
    conn: &Connection,
    email: &str,
    name: &str,
    password_hash: &str,
    role: AdminRole,
) -> Result<Admin> {
    let id = gen_id();
    let now = now();
    let email = normalize_email(email);

    conn.execute(
        "INSERT INTO admins (id, email, password_hash, name, role, is_active, created_at, last_login_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, NULL)",
        params![&id, &email, password_hash, name, role.as_ref(), now],
    )?;

    Ok(Admin {
        id,
        email,
        password_hash: password_hash.to_string(),
        name: name.to_string(),
        role,
        is_active: true,
        created_at: now,
        last_login_at: None,
    })
}

pub fn get_admin_by_email(conn: &Connection, email: &str) -> Result<Option<Admin>> {
    query_one(
        conn,
        &format!("SELECT {} FROM admins WHERE email = ?1", ADMIN_COLS),
        &[&normalize_email(email)],
    )
}

pub fn get_admin_by_id(conn: &Connection, id: &str) -> Result<Option<Admin>> {
    query_one(
        conn,
        &format!("SELECT {} FROM admins WHERE id = ?1", ADMIN_COLS),
        &[&id],
    )
}

pub fn list_admins(conn: &Connection) -> Result<Vec<Admin>> {
    query_all(
        conn,
        &format!("SELECT {} FROM admins ORDER BY created_at DESC", ADMIN_COLS),
        [],
    )
}

pub fn count_admins(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?)
}

/// Deactivation also drops the admin's open sessions, so a deactivated
/// account loses access immediately rather than at next login.
pub fn set_admin_active(conn: &Connection, id: &str, active: bool) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE admins SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if updated > 0 && !active {
        conn.execute("DELETE FROM admin_sessions WHERE admin_id = ?1", params![id])?;
    }
    Ok(updated > 0)
}

pub fn touch_admin_last_login(conn: &Connection, id: &str) -> Result<()> {
    conn.execute(
        "UPDATE admins SET last_login_at = ?1 WHERE id = ?2",
        params![now(), id],
    )?;
    Ok(())
}

// ============ Admin sessions ============

pub fn create_admin_session(
    conn: &Connection,
    admin_id: &str,
    token_hash: &str,
) -> Result<AdminSession> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO admin_sessions (id, admin_id, token_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![&id, admin_id, token_hash, now],
    )?;

    Ok(AdminSession {
        id,
        admin_id: admin_id.to_string(),
        token_hash: token_hash.to_string(),
        created_at: now,
    })
}

pub fn get_session_by_token_hash(
    conn: &Connection,
    token_hash: &str,
) -> Result<Option<AdminSession>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM admin_sessions WHERE token_hash = ?1",
            ADMIN_SESSION_COLS
        ),
        &[&token_hash],
    )
}

pub fn delete_session_by_token_hash(conn: &Connection, token_hash: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM admin_sessions WHERE token_hash = ?1",
        params![token_hash],
    )?;
    Ok(deleted > 0)
}

// ============ Users ============

pub fn create_user(
    conn: &Connection,
    input: &CreateUser,
    token_hash: Option<&str>,
) -> Result<User> {
    let id = gen_id();
    let now = now();
    let email = normalize_email(&input.email);

    conn.execute(
        "INSERT INTO users (id, email, name, token_hash, subscription_plan, subscription_status, activation_code, created_at)
         VALUES (?1, ?2, ?3, ?4, NULL, NULL, NULL, ?5)",
        params![&id, &email, &input.name, token_hash, now],
    )?;

    Ok(User {
        id,
        email,
        name: input.name.clone(),
        token_hash: token_hash.map(String::from),
        subscription_plan: None,
        subscription_status: None,
        activation_code: None,
        created_at: now,
    })
}

pub fn get_user_by_token_hash(conn: &Connection, token_hash: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE token_hash = ?1", USER_COLS),
        &[&token_hash],
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&normalize_email(email)],
    )
}

/// Write the denormalized subscription summary onto a user row. No-op when
/// no user has that email; there is no foreign key between
/// `users.activation_code` and a subscription row, so this is the single
/// place that keeps the two in step.
pub fn update_user_subscription(
    conn: &Connection,
    email: &str,
    plan: &str,
    status: SubscriptionStatus,
    activation_code: &str,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET subscription_plan = ?1, subscription_status = ?2, activation_code = ?3
         WHERE email = ?4",
        params![plan, status.as_ref(), activation_code, normalize_email(email)],
    )?;
    Ok(updated > 0)
}

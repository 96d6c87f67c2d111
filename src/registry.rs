//! Subscription registry: minting, lookup, and listing of subscriptions.
//!
//! The registry owns the only write path for subscription rows. Codes come
//! from [`crate::codes::mint`]; the activation-code primary key enforces
//! uniqueness at write time and the insert re-mints on a collision, so a
//! code that reaches a caller always names exactly one row.

use rusqlite::Connection;
use uuid::Uuid;

use crate::codes;
use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{Receipt, Subscription, SubscriptionStatus};
use crate::util::normalize_email;

const MAX_MINT_ATTEMPTS: u32 = 3;

/// Manual grant by an administrator. Plan must be non-empty; email is
/// optional and, when present, also updates the matching user row's
/// denormalized subscription summary.
pub fn create_manual(
    conn: &Connection,
    email: Option<&str>,
    plan: &str,
    duration_days: i64,
) -> Result<Subscription> {
    if plan.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }
    insert_with_fresh_code(conn, email, plan, duration_days)
}

/// Grant driven by a receipt approval: plan and email come from the
/// receipt. Called only by the receipt lifecycle manager.
pub fn create_from_receipt(
    conn: &Connection,
    receipt: &Receipt,
    duration_days: i64,
) -> Result<Subscription> {
    insert_with_fresh_code(conn, Some(&receipt.user_email), &receipt.plan, duration_days)
}

pub fn list_all(conn: &Connection) -> Result<Vec<Subscription>> {
    queries::list_subscriptions(conn)
}

pub fn find_by_code(conn: &Connection, code: &str) -> Result<Option<Subscription>> {
    queries::find_subscription_by_code(conn, code)
}

fn insert_with_fresh_code(
    conn: &Connection,
    email: Option<&str>,
    plan: &str,
    duration_days: i64,
) -> Result<Subscription> {
    let user_email = email
        .map(normalize_email)
        .filter(|e| !e.is_empty());

    for attempt in 1..=MAX_MINT_ATTEMPTS {
        let minted = codes::mint(duration_days)?;
        let sub = Subscription {
            id: Uuid::new_v4().to_string(),
            activation_code: minted.code,
            plan: plan.to_string(),
            status: SubscriptionStatus::Active,
            expires_at: minted.expires_at,
            created_at: chrono::Utc::now().timestamp(),
            user_email: user_email.clone(),
        };

        match queries::insert_subscription(conn, &sub) {
            Ok(()) => {
                if let Some(email) = &sub.user_email {
                    queries::update_user_subscription(
                        conn,
                        email,
                        &sub.plan,
                        sub.status,
                        &sub.activation_code,
                    )?;
                }
                return Ok(sub);
            }
            Err(e) if queries::is_unique_violation(&e) => {
                tracing::warn!(attempt, "activation code collision, re-minting");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(
        "could not mint a unique activation code".into(),
    ))
}

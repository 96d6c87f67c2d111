//! Receipt lifecycle: submit -> pending -> approved | rejected.
//!
//! Receipts are documents in the key-value store (`receipt:<id>`), with a
//! per-owner id index under `user:<userId>:receipts`. Both terminal states
//! are reached exactly once; the decision re-checks status inside an
//! IMMEDIATE transaction, so of two racing decisions on the same receipt
//! the second always fails with an invalid-state error.

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{AppError, Result};
use crate::kv::{KvStore, get_in, set_in};
use crate::models::{Receipt, ReceiptDecision, ReceiptStatus, ReceiptSummary, SubmitReceipt, User};
use crate::registry;

/// Duration of subscriptions issued on the approve path.
pub const APPROVAL_DURATION_DAYS: i64 = 30;

fn receipt_key(id: &str) -> String {
    format!("receipt:{id}")
}

fn user_receipts_key(user_id: &str) -> String {
    format!("user:{user_id}:receipts")
}

fn require(field: &Option<String>) -> Result<&str> {
    match field.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation("Missing required fields".into())),
    }
}

/// Check that an upload is decodable base64, tolerating the
/// `data:<mime>;base64,` prefix browsers produce via `readAsDataURL`.
fn validate_file_data(file_data: &str) -> Result<()> {
    let payload = match file_data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => file_data,
    };
    BASE64
        .decode(payload.trim())
        .map(|_| ())
        .map_err(|_| AppError::Validation("fileData is not valid base64".into()))
}

/// Create a pending receipt for an authenticated user.
///
/// Two writes: the receipt document, then the owner's id index. If the
/// second write fails the receipt exists but is unindexed for the user;
/// admin listings still find it by prefix scan.
pub fn submit(kv: &KvStore, user: &User, input: &SubmitReceipt) -> Result<Receipt> {
    let file_name = require(&input.file_name)?;
    let file_data = require(&input.file_data)?;
    let plan = require(&input.plan)?;
    let amount = require(&input.amount)?;
    validate_file_data(file_data)?;

    let receipt = Receipt {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_email: user.email.clone(),
        file_name: file_name.to_string(),
        file_data: file_data.to_string(),
        plan: plan.to_string(),
        amount: amount.to_string(),
        status: ReceiptStatus::Pending,
        created_at: Utc::now().timestamp(),
        updated_at: None,
        activation_code: None,
    };

    kv.set(&receipt_key(&receipt.id), &receipt)?;

    // Index append is read-modify-write without a lock: concurrent submits
    // by the same owner can drop an id (last write wins). Accepted; the
    // receipt itself is never lost.
    let index_key = user_receipts_key(&user.id);
    let mut ids: Vec<String> = kv.get(&index_key)?.unwrap_or_default();
    ids.push(receipt.id.clone());
    kv.set(&index_key, &ids)?;

    Ok(receipt)
}

/// Receipts owned by a user, file payload stripped.
pub fn list_for_user(kv: &KvStore, user_id: &str) -> Result<Vec<ReceiptSummary>> {
    let ids: Vec<String> = kv.get(&user_receipts_key(user_id))?.unwrap_or_default();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(receipt) = kv.get::<Receipt>(&receipt_key(&id))? {
            out.push(receipt.into());
        }
    }
    Ok(out)
}

/// All receipts, full documents, for administrator review.
pub fn list_all(kv: &KvStore) -> Result<Vec<Receipt>> {
    kv.get_by_prefix("receipt:")
}

/// Apply a terminal decision to a pending receipt.
///
/// Approval mints a 30-day subscription through the registry, then rewrites
/// the receipt with its activation code. The subscription insert and the
/// receipt rewrite hit two different stores and are not atomic: if the
/// receipt write fails after the insert, an orphan subscription remains
/// (known gap, inherited from the two-store design).
pub fn transition(
    kv: &KvStore,
    conn: &Connection,
    receipt_id: &str,
    decision: ReceiptDecision,
) -> Result<Receipt> {
    let key = receipt_key(receipt_id);

    kv.transaction(|tx| {
        // Status must be re-read under the write lock, not just checked by
        // the caller, or two concurrent approvals could both pass.
        let mut receipt: Receipt = get_in(tx, &key)?
            .ok_or_else(|| AppError::NotFound("Receipt not found".into()))?;

        if receipt.status != ReceiptStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Receipt is already {}",
                receipt.status.as_ref()
            )));
        }

        receipt.updated_at = Some(Utc::now().timestamp());
        match decision {
            ReceiptDecision::Approved => {
                let sub = registry::create_from_receipt(conn, &receipt, APPROVAL_DURATION_DAYS)?;
                receipt.status = ReceiptStatus::Approved;
                receipt.activation_code = Some(sub.activation_code);
            }
            ReceiptDecision::Rejected => {
                receipt.status = ReceiptStatus::Rejected;
            }
        }

        set_in(tx, &key, &receipt)?;
        Ok(receipt)
    })
}

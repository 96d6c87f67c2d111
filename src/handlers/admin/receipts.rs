use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{Receipt, ReceiptDecision};
use crate::receipts;

#[derive(Serialize)]
pub struct AdminReceiptsResponse {
    pub success: bool,
    pub receipts: Vec<Receipt>,
}

/// GET /admin/receipts. Every receipt, full documents including the file
/// payload, since the reviewer needs to inspect the uploaded proof.
pub async fn list_receipts(State(state): State<AppState>) -> Result<Json<AdminReceiptsResponse>> {
    let receipts = receipts::list_all(&state.kv)?;
    Ok(Json(AdminReceiptsResponse {
        success: true,
        receipts,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceiptRequest {
    #[serde(default)]
    pub receipt_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// POST /admin/update-receipt. Decides a pending receipt. Approval mints a
/// 30-day subscription; re-deciding an already-decided receipt is a 409.
pub async fn update_receipt(
    State(state): State<AppState>,
    Json(body): Json<UpdateReceiptRequest>,
) -> Result<Json<serde_json::Value>> {
    let (Some(receipt_id), Some(status)) = (body.receipt_id.as_deref(), body.status.as_deref())
    else {
        return Err(AppError::Validation("Missing required fields".into()));
    };

    let decision: ReceiptDecision = status
        .parse()
        .map_err(|_| AppError::Validation("Status must be approved or rejected".into()))?;

    let conn = state.db.get()?;
    let receipt = receipts::transition(&state.kv, &conn, receipt_id, decision)?;

    tracing::info!(
        "receipt {} transitioned to {}",
        receipt.id,
        receipt.status.as_ref()
    );

    Ok(Json(serde_json::json!({ "success": true })))
}

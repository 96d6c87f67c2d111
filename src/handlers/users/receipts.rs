use axum::extract::{Extension, State};
use serde::Serialize;

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::UserContext;
use crate::models::{ReceiptSummary, SubmitReceipt};
use crate::receipts;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceiptResponse {
    pub success: bool,
    pub receipt_id: String,
    pub message: &'static str,
}

/// POST /upload-receipt. Creates a pending receipt for review.
pub async fn upload_receipt(
    State(state): State<AppState>,
    Extension(ctx): Extension<UserContext>,
    Json(input): Json<SubmitReceipt>,
) -> Result<Json<UploadReceiptResponse>> {
    let receipt = receipts::submit(&state.kv, &ctx.user, &input)?;

    tracing::info!(
        "receipt {} submitted by user {} (plan: {})",
        receipt.id,
        ctx.user.id,
        receipt.plan
    );

    Ok(Json(UploadReceiptResponse {
        success: true,
        receipt_id: receipt.id,
        message: "Receipt uploaded successfully",
    }))
}

#[derive(Serialize)]
pub struct ReceiptsResponse {
    pub success: bool,
    pub receipts: Vec<ReceiptSummary>,
}

/// GET /receipts. The caller's own receipts, file payload stripped.
pub async fn list_receipts(
    State(state): State<AppState>,
    Extension(ctx): Extension<UserContext>,
) -> Result<Json<ReceiptsResponse>> {
    let receipts = receipts::list_for_user(&state.kv, &ctx.user.id)?;
    Ok(Json(ReceiptsResponse {
        success: true,
        receipts,
    }))
}

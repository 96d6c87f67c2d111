use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReceiptStatus {
    Pending,
    Approved,
    Rejected,
}

/// Terminal decisions an administrator can apply to a pending receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReceiptDecision {
    Approved,
    Rejected,
}

/// A payment receipt document as stored in the key-value store under
/// `receipt:<id>`. Field names stay camelCase on the wire for
/// compatibility with existing clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub file_name: String,
    /// Uploaded proof of payment, base64.
    pub file_data: String,
    pub plan: String,
    pub amount: String,
    pub status: ReceiptStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Present iff status is approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_code: Option<String>,
}

/// Receipt without the file payload, for user-facing listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub file_name: String,
    pub plan: String,
    pub amount: String,
    pub status: ReceiptStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_code: Option<String>,
}

impl From<Receipt> for ReceiptSummary {
    fn from(r: Receipt) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            user_email: r.user_email,
            file_name: r.file_name,
            plan: r.plan,
            amount: r.amount,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
            activation_code: r.activation_code,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

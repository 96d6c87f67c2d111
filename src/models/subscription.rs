use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

/// A time-bounded access grant, identified externally by its activation
/// code. Expiry is stored but not auto-flipped: a row can read
/// `active` while `expires_at` is in the past.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub activation_code: String,
    pub plan: String,
    pub status: SubscriptionStatus,
    pub expires_at: i64,
    pub created_at: i64,
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscription {
    #[serde(default)]
    pub email: Option<String>,
    pub plan: Option<String>,
    /// Accepts a number or a numeric string ("90"), matching the original
    /// admin form which posted strings.
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
}

impl CreateSubscription {
    /// Parse the duration field to days, tolerating string or integer input.
    pub fn duration_days(&self) -> Option<i64> {
        match self.duration.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

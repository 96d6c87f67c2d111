use serde::{Deserialize, Serialize};

use super::SubscriptionStatus;

/// Account-holder record. Authentication of these users is delegated to an
/// external identity provider; here a user row only carries the digest of
/// its bearer token plus a denormalized subscription summary kept in sync
/// by the registry when a subscription is granted for the same email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub token_hash: Option<String>,
    pub subscription_plan: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub activation_code: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
}

use axum::extract::State;
use serde::Serialize;

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{CreateSubscription, Subscription};
use crate::registry;

#[derive(Serialize)]
pub struct SubscriptionsResponse {
    pub success: bool,
    pub subscriptions: Vec<Subscription>,
}

/// GET /admin/subscriptions, newest first.
pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<SubscriptionsResponse>> {
    let conn = state.db.get()?;
    let subscriptions = registry::list_all(&conn)?;
    Ok(Json(SubscriptionsResponse {
        success: true,
        subscriptions,
    }))
}

#[derive(Serialize)]
pub struct SubscriptionCreated {
    pub success: bool,
    pub subscription: Subscription,
    pub activation_code: String,
}

/// POST /admin/create-subscription. Manual grant with an arbitrary
/// duration; email is optional.
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(body): Json<CreateSubscription>,
) -> Result<Json<SubscriptionCreated>> {
    let plan = body
        .plan
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".into()))?;
    let duration_days = body
        .duration_days()
        .ok_or_else(|| AppError::Validation("Missing required fields".into()))?;

    let conn = state.db.get()?;
    let subscription = registry::create_manual(&conn, body.email.as_deref(), plan, duration_days)?;

    tracing::info!(
        "manual subscription {} created (plan: {}, {} days)",
        subscription.id,
        subscription.plan,
        duration_days
    );

    let activation_code = subscription.activation_code.clone();
    Ok(Json(SubscriptionCreated {
        success: true,
        subscription,
        activation_code,
    }))
}

mod admins;
mod auth;
mod receipts;
mod subscriptions;

pub use admins::*;
pub use auth::*;
pub use receipts::*;
pub use subscriptions::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::db::AppState;
use crate::middleware::{admin_auth, require_super_admin};

pub fn router(state: AppState) -> Router<AppState> {
    let session_routes = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(admin_me))
        .route("/subscriptions", get(list_subscriptions))
        .route("/receipts", get(list_receipts))
        .route("/create-subscription", post(create_subscription))
        .route("/update-receipt", post(update_receipt))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    let super_admin_routes = Router::new()
        .route("/admins", post(create_admin).get(list_admins))
        .route("/admins/{id}/deactivate", post(deactivate_admin))
        .route_layer(middleware::from_fn_with_state(state, require_super_admin));

    Router::new()
        .route("/login", post(login))
        .merge(session_routes)
        .merge(super_admin_routes)
}

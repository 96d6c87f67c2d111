mod receipts;

pub use receipts::*;

use axum::extract::Extension;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use serde::Serialize;

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::{UserContext, user_auth};
use crate::models::User;

#[derive(Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: User,
}

pub async fn me(Extension(ctx): Extension<UserContext>) -> Result<Json<MeResponse>> {
    Ok(Json(MeResponse {
        success: true,
        user: ctx.user,
    }))
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/upload-receipt", post(upload_receipt))
        .route("/receipts", get(list_receipts))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, user_auth))
}

pub mod admin;
pub mod dev;
pub mod public;
pub mod users;

use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::AppState;

/// Assemble the full application router. Dev-only routes are mounted only
/// when dev mode is on.
pub fn router(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(600));

    let mut router = Router::new()
        .merge(public::router())
        .merge(users::router(state.clone()))
        .nest("/admin", admin::router(state.clone()));

    if state.dev_mode {
        router = router.nest("/dev", dev::router());
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .with_state(state)
}

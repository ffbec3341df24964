//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, http::handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/rules/:id", get(handlers::get_rule))
        .route("/v1/charging-keys", post(handlers::charging_keys))
        .route("/v1/base-names/expand", post(handlers::expand_base_names))
        .route("/metrics", get(handlers::metrics))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}

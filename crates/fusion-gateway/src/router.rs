//! Axum router wiring.
//!
//! Exact (method, path) route table. Unknown paths get a 404 envelope and
//! unknown methods on a known path a 405 envelope. Request bodies are capped
//! at `MAX_BODY_BYTES`; handlers see an oversized body as a read failure.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub const ROUTES: [(&str, &str); 6] = [
    ("GET", "/health"),
    ("POST", "/fuse"),
    ("GET", "/metrics"),
    ("GET", "/stats"),
    ("GET", "/config"),
    ("POST", "/config"),
];

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(ops::health).fallback(api::method_not_allowed))
        .route("/fuse", post(api::fuse::fuse).fallback(api::method_not_allowed))
        .route("/metrics", get(ops::metrics).fallback(api::method_not_allowed))
        .route("/stats", get(ops::stats).fallback(api::method_not_allowed))
        .route(
            "/config",
            get(api::config::get_config)
                .post(api::config::set_config)
                .fallback(api::method_not_allowed),
        )
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

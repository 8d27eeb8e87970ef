//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness + version
//! - `/metrics` : Prometheus text format
//! - `/stats`   : service statistics with an embedded JSON metrics snapshot

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use fusion_core::error::FusionError;

use crate::api::envelope::{data, Envelope};
use crate::api::RequestScope;
use crate::app_state::AppState;

pub const VERSION: &str = "0.1.0";
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Response {
    let scope = RequestScope::enter(state.metrics(), "/health");
    let body = Envelope::success(data([
        ("status", state.service().health_check().to_string()),
        ("version", VERSION.to_string()),
    ]));
    scope.finish(Ok::<_, FusionError>(body))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let scope = RequestScope::enter(state.metrics(), "/metrics");
    let body = state.metrics().render_prometheus();
    scope.finish(Ok::<_, FusionError>((
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        body,
    )))
}

pub async fn stats(State(state): State<AppState>) -> Response {
    let scope = RequestScope::enter(state.metrics(), "/stats");
    let stats = state.service().get_stats();

    let body = Envelope::success(data([
        ("total_requests", stats.total_requests.to_string()),
        ("successful_requests", stats.successful_requests.to_string()),
        ("failed_requests", stats.failed_requests.to_string()),
        ("average_fused_value", stats.average_fused_value.to_string()),
        ("last_confidence", stats.last_confidence.to_string()),
        ("start_time", stats.start_time_unix_ms.to_string()),
        ("uptime_seconds", stats.uptime.as_secs().to_string()),
        ("metrics", state.metrics().render_json()),
    ]));
    scope.finish(Ok::<_, FusionError>(body.into_response()))
}

//! `GET /config` and `POST /config`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Response,
    Json,
};

use fusion_core::error::FusionError;

use crate::api::envelope::Envelope;
use crate::api::{read_body, RequestScope};
use crate::app_state::AppState;

pub async fn get_config(State(state): State<AppState>) -> Response {
    let scope = RequestScope::enter(state.metrics(), "/config");
    let cfg = state.service().get_config();
    scope.finish(Ok(Json(cfg)))
}

pub async fn set_config(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let scope = RequestScope::enter(state.metrics(), "/config");

    let result = read_body(body)
        .and_then(|body| {
            let json = std::str::from_utf8(&body)
                .map_err(|e| FusionError::InvalidConfig(format!("body is not utf-8: {e}")))?;
            state.service().set_config(json)
        })
        .map(|cfg| {
            tracing::info!(
                outlier_threshold = cfg.outlier_threshold,
                min_confidence = cfg.min_confidence,
                enable_outlier_detection = cfg.enable_outlier_detection,
                "configuration updated"
            );
            Envelope::success_message("Configuration updated")
        })
        .map_err(|e| {
            tracing::warn!(error = %e, "configuration rejected");
            e
        });

    scope.finish(result)
}

//! `POST /fuse`: fuse a batch of readings.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Response,
};
use serde_json::Value;

use fusion_core::error::{FusionError, Result};

use crate::api::envelope::{data, Envelope};
use crate::api::{read_body, RequestScope};
use crate::app_state::AppState;

pub async fn fuse(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let scope = RequestScope::enter(state.metrics(), "/fuse");

    let result = read_body(body)
        .and_then(|body| parse_readings(&body))
        .and_then(|readings| {
            let fused_value = state.service().fuse_readings(&readings)?;
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis();

            Ok(Envelope::success(data([
                ("fused_value", fused_value.to_string()),
                ("input_count", readings.len().to_string()),
                ("timestamp", timestamp.to_string()),
            ])))
        });

    scope.finish(result)
}

/// Extract `readings` from a `{"readings": [..]}` body.
///
/// Other top-level keys are ignored. Every element must be a finite number
/// and the array must not be empty.
pub fn parse_readings(body: &[u8]) -> Result<Vec<f64>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FusionError::BadRequest(format!("invalid JSON body: {e}")))?;

    let obj = value
        .as_object()
        .ok_or_else(|| FusionError::BadRequest("request body must be a JSON object".into()))?;

    let raw = obj
        .get("readings")
        .ok_or_else(|| FusionError::BadRequest("missing 'readings' field".into()))?;

    let items = raw
        .as_array()
        .ok_or_else(|| FusionError::BadRequest("'readings' must be an array".into()))?;

    if items.is_empty() {
        return Err(FusionError::EmptyReadings);
    }

    items
        .iter()
        .map(|v| {
            v.as_f64().filter(|x| x.is_finite()).ok_or_else(|| {
                FusionError::BadRequest(format!("invalid number in readings array: {v}"))
            })
        })
        .collect()
}

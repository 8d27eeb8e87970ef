//! HTTP adapter: request accounting, JSON endpoints, and routing fallbacks.
//!
//! Every handler opens a `RequestScope` first. The scope bumps
//! `requests_total{endpoint=...}`, holds the `request_duration_ms` timer for
//! the rest of the handler, and is the single place where errors are counted
//! (`errors_total{endpoint=...,error=...}`) and turned into responses.

pub mod config;
pub mod envelope;
pub mod fuse;

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use fusion_core::error::FusionError;

use crate::error::ApiError;
use crate::obs::{labels, MetricsRegistry, ScopedTimer};

use envelope::Envelope;

pub const REQUESTS_TOTAL: &str = "requests_total";
pub const ERRORS_TOTAL: &str = "errors_total";
pub const REQUEST_DURATION_MS: &str = "request_duration_ms";

pub struct RequestScope<'a> {
    metrics: &'a MetricsRegistry,
    endpoint: &'static str,
    _timer: ScopedTimer<'a>,
}

impl<'a> RequestScope<'a> {
    pub fn enter(metrics: &'a MetricsRegistry, endpoint: &'static str) -> Self {
        let endpoint_labels = labels(&[("endpoint", endpoint)]);
        let timer = metrics.start_timer(REQUEST_DURATION_MS, &endpoint_labels);
        metrics.increment_counter(REQUESTS_TOTAL, &endpoint_labels);
        Self {
            metrics,
            endpoint,
            _timer: timer,
        }
    }

    /// Convert a handler result into a response, counting failures.
    pub fn finish<R: IntoResponse>(&self, result: Result<R, FusionError>) -> Response {
        match result {
            Ok(r) => r.into_response(),
            Err(e) => {
                let class = e.class();
                self.metrics.increment_counter(
                    ERRORS_TOTAL,
                    &labels(&[("endpoint", self.endpoint), ("error", class.as_str())]),
                );
                tracing::debug!(endpoint = self.endpoint, error = %e, class = class.as_str(), "request failed");
                ApiError(e).into_response()
            }
        }
    }
}

/// Turn a body extraction failure (size limit, broken stream) into a
/// `BadRequest` so it goes through `RequestScope::finish` like any other error.
pub fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, FusionError> {
    body.map_err(|e| FusionError::BadRequest(format!("failed to read request body: {}", e.body_text())))
}

pub async fn not_found() -> Response {
    Envelope::error("Not found").into_response_with(StatusCode::NOT_FOUND)
}

pub async fn method_not_allowed() -> Response {
    Envelope::error("Method not allowed").into_response_with(StatusCode::METHOD_NOT_ALLOWED)
}

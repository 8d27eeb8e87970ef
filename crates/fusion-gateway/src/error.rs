//! Gateway-level errors: HTTP mapping for `FusionError` and startup failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use fusion_core::error::FusionError;

use crate::api::envelope::Envelope;

/// Body returned for every internal error; details go to the log only.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("config: {0}")]
    Config(#[from] FusionError),
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// HTTP wrapper around `FusionError`.
#[derive(Debug)]
pub struct ApiError(pub FusionError);

impl From<FusionError> for ApiError {
    fn from(e: FusionError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            FusionError::BadRequest(_)
            | FusionError::EmptyReadings
            | FusionError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            FusionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            FusionError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error while handling request");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        Envelope::error(message).into_response_with(status)
    }
}

//! Shared error type across fusion crates.

use thiserror::Error;

/// Error classes surfaced to clients and used as the `error` label on
/// `errors_total` (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Missing/misformatted body or a non-numeric reading.
    BadRequest,
    /// `readings` was present but empty.
    EmptyReadings,
    /// Configuration update could not be parsed or validated.
    InvalidConfig,
    /// Anything the estimator or facade raised that is not classified above.
    Internal,
}

impl ErrorClass {
    /// Label value used in metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::EmptyReadings => "empty_readings",
            ErrorClass::InvalidConfig => "invalid_config",
            ErrorClass::Internal => "internal_error",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FusionError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("{0}")]
    BadRequest(String),
    #[error("readings array cannot be empty")]
    EmptyReadings,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FusionError {
    /// Map internal error to a stable class.
    pub fn class(&self) -> ErrorClass {
        match self {
            FusionError::BadRequest(_) => ErrorClass::BadRequest,
            FusionError::EmptyReadings => ErrorClass::EmptyReadings,
            FusionError::InvalidConfig(_) => ErrorClass::InvalidConfig,
            FusionError::Internal(_) => ErrorClass::Internal,
        }
    }
}

//! Fusion configuration value object.
//!
//! `FusionConfig` is immutable once built; the gateway swaps whole snapshots
//! rather than mutating fields in place.

use serde::{Deserialize, Serialize};

use crate::error::{FusionError, Result};

pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// z-score cutoff above which a reading is an outlier.
    pub outlier_threshold: f64,
    /// Informational only; fusion is never rejected on confidence.
    pub min_confidence: f64,
    pub enable_outlier_detection: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            enable_outlier_detection: true,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.outlier_threshold.is_finite() || self.outlier_threshold <= 0.0 {
            return Err(FusionError::InvalidConfig(
                "outlier_threshold must be a positive finite number".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(FusionError::InvalidConfig(
                "min_confidence must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

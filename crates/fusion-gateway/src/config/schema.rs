use serde::Deserialize;

use fusion_core::error::Result;
use fusion_core::FusionConfig;

/// Partial fusion configuration accepted by `POST /config` and `--config`.
///
/// Unrecognized keys are ignored; absent keys keep the current value.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ConfigPatch {
    #[serde(default)]
    pub outlier_threshold: Option<f64>,

    #[serde(default)]
    pub min_confidence: Option<f64>,

    #[serde(default)]
    pub enable_outlier_detection: Option<bool>,
}

impl ConfigPatch {
    /// Build a complete config from `base` plus this patch and validate it.
    pub fn apply(&self, base: &FusionConfig) -> Result<FusionConfig> {
        let cfg = FusionConfig {
            outlier_threshold: self.outlier_threshold.unwrap_or(base.outlier_threshold),
            min_confidence: self.min_confidence.unwrap_or(base.min_confidence),
            enable_outlier_detection: self
                .enable_outlier_detection
                .unwrap_or(base.enable_outlier_detection),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn is_empty(&self) -> bool {
        self.outlier_threshold.is_none()
            && self.min_confidence.is_none()
            && self.enable_outlier_detection.is_none()
    }
}

//! Fusion config parsing.
//!
//! Runtime updates arrive as JSON (`POST /config`); the boot file given with
//! `--config` is read as YAML, which also accepts JSON documents. Both must
//! be a single object/mapping.

pub mod schema;

use std::fs;
use std::path::Path;

use fusion_core::error::{FusionError, Result};
use fusion_core::FusionConfig;

pub use schema::ConfigPatch;

pub fn parse_json(s: &str) -> Result<ConfigPatch> {
    let value: serde_json::Value = serde_json::from_str(s)
        .map_err(|e| FusionError::InvalidConfig(format!("invalid json: {e}")))?;
    if !value.is_object() {
        return Err(FusionError::InvalidConfig("config must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| FusionError::InvalidConfig(e.to_string()))
}

pub fn load_from_file(path: &Path) -> Result<ConfigPatch> {
    let s = fs::read_to_string(path).map_err(|e| {
        FusionError::InvalidConfig(format!("read config failed ({}): {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ConfigPatch> {
    let value: serde_yaml::Value = serde_yaml::from_str(s)
        .map_err(|e| FusionError::InvalidConfig(format!("invalid yaml: {e}")))?;
    if !value.is_mapping() {
        return Err(FusionError::InvalidConfig("config must be a mapping".into()));
    }
    serde_yaml::from_value(value).map_err(|e| FusionError::InvalidConfig(e.to_string()))
}

/// Read the `--config` file and resolve it against the defaults.
///
/// A file without any recognized key is accepted (defaults apply) but logged.
pub fn load_boot_config(path: &Path) -> Result<FusionConfig> {
    let patch = load_from_file(path)?;
    if patch.is_empty() {
        tracing::warn!(path = %path.display(), "config file has no recognized keys; using defaults");
    }
    patch.apply(&FusionConfig::default())
}

//! Fusion service facade.
//!
//! Owns the live configuration snapshot and the request statistics, and runs
//! the estimator on behalf of the HTTP adapter.
//!
//! - Config is an immutable `FusionConfig` behind `ArcSwap`; each fusion call
//!   loads one snapshot at entry, updates replace the whole value.
//! - Counters are individually atomic; there is no cross-counter atomicity.
//! - The running sum is kept in integer milli-units and saturates at the
//!   `i64` bounds (about ±9.2e15 in fused-value units) instead of wrapping.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;

use fusion_core::error::{FusionError, Result};
use fusion_core::{estimator, FusionConfig};

use crate::config::{self, ConfigPatch};

const MILLI: f64 = 1000.0;

/// Point-in-time copy of the service statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// `sum(floor(1000 * v)) / (1000 * count)`, 0 before the first fusion.
    pub average_fused_value: f64,
    /// Confidence of the most recent successful fusion.
    pub last_confidence: f64,
    /// Facade construction time, Unix epoch milliseconds.
    pub start_time_unix_ms: u64,
    pub uptime: Duration,
}

pub struct FusionService {
    config: ArcSwap<FusionConfig>,
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    sum_fused_milli: AtomicI64,
    fused_count: AtomicU64,
    last_confidence: AtomicU64,
    started_at: Instant,
    start_time_unix_ms: u64,
}

impl Default for FusionService {
    fn default() -> Self {
        Self::new()
    }
}

impl FusionService {
    pub fn new() -> Self {
        Self::with_config(FusionConfig::default())
    }

    pub fn with_config(cfg: FusionConfig) -> Self {
        let start_time_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            config: ArcSwap::from_pointee(cfg),
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            sum_fused_milli: AtomicI64::new(0),
            fused_count: AtomicU64::new(0),
            last_confidence: AtomicU64::new(0f64.to_bits()),
            started_at: Instant::now(),
            start_time_unix_ms,
        }
    }

    pub fn health_check(&self) -> &'static str {
        "ok"
    }

    /// Fuse one batch and account for it in the statistics.
    pub fn fuse_readings(&self, readings: &[f64]) -> Result<f64> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let cfg = self.config.load_full();
        let out = estimator::fuse_detailed(readings, &cfg);

        if !out.value.is_finite() {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
            return Err(FusionError::Internal(format!(
                "estimator produced a non-finite value (method={}, input_count={})",
                out.method.as_str(),
                out.input_count
            )));
        }

        tracing::debug!(
            input_count = out.input_count,
            retained = out.retained,
            method = out.method.as_str(),
            confidence = out.confidence,
            fused_value = out.value,
            "fusion complete"
        );
        if out.input_count > 0 && out.confidence < cfg.min_confidence {
            tracing::debug!(
                confidence = out.confidence,
                min_confidence = cfg.min_confidence,
                "fusion confidence below configured minimum"
            );
        }

        // `as` saturates the delta; the accumulation saturates too.
        let delta = (out.value * MILLI).floor() as i64;
        let _ = self
            .sum_fused_milli
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |sum| {
                Some(sum.saturating_add(delta))
            });
        self.fused_count.fetch_add(1, Ordering::Relaxed);
        self.last_confidence
            .store(out.confidence.to_bits(), Ordering::Relaxed);
        self.successful_requests.fetch_add(1, Ordering::Relaxed);

        Ok(out.value)
    }

    /// Current configuration snapshot.
    pub fn get_config(&self) -> FusionConfig {
        **self.config.load()
    }

    /// Parse a JSON object and apply its recognized keys atomically.
    pub fn set_config(&self, json: &str) -> Result<FusionConfig> {
        let patch = config::parse_json(json)?;
        self.apply_config(&patch)
    }

    /// Apply a patch on top of the current snapshot. On error the snapshot is
    /// left untouched.
    pub fn apply_config(&self, patch: &ConfigPatch) -> Result<FusionConfig> {
        let mut outcome = Err(FusionError::Internal("config update not applied".into()));
        self.config.rcu(|cur| match patch.apply(cur) {
            Ok(next) => {
                outcome = Ok(next);
                Arc::new(next)
            }
            Err(e) => {
                outcome = Err(e);
                Arc::clone(cur)
            }
        });
        outcome
    }

    pub fn get_stats(&self) -> StatsSnapshot {
        let count = self.fused_count.load(Ordering::Relaxed);
        let average_fused_value = if count > 0 {
            self.sum_fused_milli.load(Ordering::Relaxed) as f64 / (count as f64 * MILLI)
        } else {
            0.0
        };

        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            average_fused_value,
            last_confidence: f64::from_bits(self.last_confidence.load(Ordering::Relaxed)),
            start_time_unix_ms: self.start_time_unix_ms,
            uptime: self.started_at.elapsed(),
        }
    }

    /// Zero all counters. `start_time` is kept.
    pub fn reset_stats(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.sum_fused_milli.store(0, Ordering::Relaxed);
        self.fused_count.store(0, Ordering::Relaxed);
        self.last_confidence.store(0f64.to_bits(), Ordering::Relaxed);
    }
}

//! Sensor-fusion estimator.
//!
//! Collapses a batch of finite readings into one scalar:
//! 1. optional z-score outlier pre-filter (population standard deviation),
//! 2. median when at least three readings survive the filter,
//! 3. otherwise an inverse-squared-deviation weighted mean.
//!
//! Everything here is a pure function of `(readings, config)`; there is no
//! I/O and no failure path. Callers are expected to reject NaN/±inf before
//! invoking the estimator.

use std::cmp::Ordering;

use crate::config::FusionConfig;

/// Which estimator produced the fused value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Empty batch, fused value is 0.
    Empty,
    Median,
    WeightedMean,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Empty => "empty",
            Method::Median => "median",
            Method::WeightedMean => "weighted_mean",
        }
    }
}

/// Full result of one fusion pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fusion {
    pub value: f64,
    /// Retention/consistency score in [0, 1]. Not part of the fused value.
    pub confidence: f64,
    pub method: Method,
    pub input_count: usize,
    /// Readings left after outlier filtering.
    pub retained: usize,
}

/// Fuse `readings` into a single estimate.
pub fn fuse(readings: &[f64], cfg: &FusionConfig) -> f64 {
    fuse_detailed(readings, cfg).value
}

/// Fuse `readings` and report how the value was obtained.
pub fn fuse_detailed(readings: &[f64], cfg: &FusionConfig) -> Fusion {
    if readings.is_empty() {
        return Fusion {
            value: 0.0,
            confidence: 0.0,
            method: Method::Empty,
            input_count: 0,
            retained: 0,
        };
    }

    let filtered = if cfg.enable_outlier_detection && readings.len() > 2 {
        filter_outliers(readings, cfg.outlier_threshold)
    } else {
        readings.to_vec()
    };

    let (value, method) = if filtered.len() >= 3 {
        (median(&filtered), Method::Median)
    } else {
        (weighted_mean(&filtered), Method::WeightedMean)
    };

    Fusion {
        value,
        confidence: confidence(readings, &filtered),
        method,
        input_count: readings.len(),
        retained: filtered.len(),
    }
}

/// Values whose z-score exceeds `threshold`, in input order.
///
/// Batches of two or fewer readings never contain outliers, and neither does
/// a batch with zero spread.
pub fn detect_outliers(readings: &[f64], threshold: f64) -> Vec<f64> {
    if readings.len() <= 2 {
        return Vec::new();
    }

    let mu = mean(readings);
    let sigma = population_std_dev(readings, mu);
    if sigma == 0.0 {
        return Vec::new();
    }

    readings
        .iter()
        .copied()
        .filter(|x| ((x - mu) / sigma).abs() > threshold)
        .collect()
}

/// Drop every reading equal to a detected outlier, preserving order.
///
/// Removal is by value: duplicates of an outlier value go with it. If nothing
/// would remain, the original batch is returned unchanged.
pub fn filter_outliers(readings: &[f64], threshold: f64) -> Vec<f64> {
    let outliers = detect_outliers(readings, threshold);
    if outliers.is_empty() {
        return readings.to_vec();
    }

    let filtered: Vec<f64> = readings
        .iter()
        .copied()
        .filter(|x| !outliers.contains(x))
        .collect();

    if filtered.is_empty() {
        readings.to_vec()
    } else {
        filtered
    }
}

/// Median; the mean of the two middle elements for even counts.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Weighted mean with `w = 1 / (1 + (x - mean)^2)`.
pub fn weighted_mean(values: &[f64]) -> f64 {
    match values {
        [] => return 0.0,
        [x] => return *x,
        _ => {}
    }

    let mu = mean(values);
    let (weighted_sum, total_weight) = values.iter().fold((0.0, 0.0), |(ws, tw), &x| {
        let diff = x - mu;
        let w = 1.0 / (1.0 + diff * diff);
        (ws + w * x, tw + w)
    });

    if total_weight == 0.0 {
        return mu;
    }
    weighted_sum / total_weight
}

/// Confidence of a fusion pass: retention rate scaled by the consistency of
/// the retained readings (`1 / (1 + coefficient of variation)`).
pub fn confidence(readings: &[f64], filtered: &[f64]) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }

    let retention = filtered.len() as f64 / readings.len() as f64;
    if filtered.len() <= 1 {
        return retention;
    }

    let mu = mean(filtered);
    let sigma = population_std_dev(filtered, mu);
    // zero spread is fully consistent, even around a zero mean
    let cv = if sigma == 0.0 { 0.0 } else { sigma / mu.abs() };
    retention / (1.0 + cv)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with divisor N.
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|x| (x - mean) * (x - mean))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

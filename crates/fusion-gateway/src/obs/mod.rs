//! Lightweight in-process metrics.
//!
//! Counters, histograms and gauges are stored as atomics in a shared registry
//! and rendered by the `/metrics` (Prometheus text) and `/stats` (JSON)
//! handlers. Request durations are recorded through `ScopedTimer`.

pub mod metrics;
pub mod timer;

pub use metrics::{labels, MetricsRegistry};
pub use timer::ScopedTimer;

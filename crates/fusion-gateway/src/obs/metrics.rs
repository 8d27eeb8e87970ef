//! Process-wide metrics registry for the gateway.
//!
//! Series are keyed by `(name, labels)` where `labels` is an opaque,
//! pre-rendered label string (`endpoint="/fuse"`) used verbatim in output.
//! Each metric name belongs to exactly one family (counter, histogram,
//! gauge) across all its label sets; the family is fixed by the first write. Entries live in a `DashMap`, so all
//! mutation of one entry happens under its shard lock and a renderer sees a
//! consistent snapshot per entry (not across entries).
//!
//! Histogram buckets are fixed in milliseconds and stored per bucket; the
//! cumulative form is produced only when rendering Prometheus text.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;

use super::timer::ScopedTimer;

/// Upper bounds of the finite buckets. Bucket 9 is `+Inf`.
pub const BUCKET_BOUNDS: [f64; 9] = [1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0];
const BUCKETS: usize = BUCKET_BOUNDS.len() + 1;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Render label pairs into the opaque label string, sorted by key.
pub fn labels(pairs: &[(&str, &str)]) -> String {
    let mut pairs = pairs.to_vec();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    Counter,
    Histogram,
    Gauge,
}

impl Family {
    fn as_str(self) -> &'static str {
        match self {
            Family::Counter => "counter",
            Family::Histogram => "histogram",
            Family::Gauge => "gauge",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Family::Counter => "Total count",
            Family::Histogram => "Request duration histogram",
            Family::Gauge => "Current value",
        }
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

impl AtomicHistogram {
    fn observe(&self, value: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        // Fractional milliseconds are dropped from the sum; negatives clamp to 0.
        self.sum.fetch_add(value as u64, Ordering::Relaxed);

        let idx = BUCKET_BOUNDS
            .iter()
            .position(|&b| value <= b)
            .unwrap_or(BUCKETS - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }
}

enum Series {
    Counter(AtomicU64),
    Histogram(AtomicHistogram),
    /// f64 bits.
    Gauge(AtomicU64),
}

impl Series {
    fn new(family: Family) -> Self {
        match family {
            Family::Counter => Series::Counter(AtomicU64::new(0)),
            Family::Histogram => Series::Histogram(AtomicHistogram::default()),
            Family::Gauge => Series::Gauge(AtomicU64::new(0f64.to_bits())),
        }
    }

    fn family(&self) -> Family {
        match self {
            Series::Counter(_) => Family::Counter,
            Series::Histogram(_) => Family::Histogram,
            Series::Gauge(_) => Family::Gauge,
        }
    }

    fn snapshot(&self) -> Sample {
        match self {
            Series::Counter(v) => Sample::Counter(v.load(Ordering::Relaxed)),
            Series::Histogram(h) => Sample::Histogram {
                count: h.count.load(Ordering::Relaxed),
                sum: h.sum.load(Ordering::Relaxed),
                buckets: std::array::from_fn(|i| h.buckets[i].load(Ordering::Relaxed)),
            },
            Series::Gauge(bits) => Sample::Gauge(f64::from_bits(bits.load(Ordering::Relaxed))),
        }
    }
}

/// Point-in-time value of one series.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Counter(u64),
    Histogram {
        count: u64,
        sum: u64,
        /// Per-bucket (not cumulative) counts; last entry is `+Inf`.
        buckets: [u64; BUCKETS],
    },
    Gauge(f64),
}

impl Sample {
    fn family(&self) -> Family {
        match self {
            Sample::Counter(_) => Family::Counter,
            Sample::Histogram { .. } => Family::Histogram,
            Sample::Gauge(_) => Family::Gauge,
        }
    }
}

/// JSON form served inside `/stats`. Labels are not part of the keys, so
/// label-distinct series under one name collapse to the last one rendered.
#[derive(Debug, Default, Serialize)]
pub struct JsonMetrics {
    pub counters: BTreeMap<String, u64>,
    pub histograms: BTreeMap<String, HistogramSummary>,
    pub gauges: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: u64,
}

#[derive(Default)]
pub struct MetricsRegistry {
    families: DashMap<String, Family>,
    series: DashMap<(String, String), Series>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_series(&self, name: &str, labels: &str, family: Family, f: impl FnOnce(&Series)) {
        // One family per name, or the exposition would carry two `# TYPE` lines.
        let registered = *self
            .families
            .entry(name.to_string())
            .or_insert(family)
            .value();
        if registered != family {
            tracing::warn!(
                metric = %name,
                labels = %labels,
                registered = registered.as_str(),
                requested = family.as_str(),
                "metric already registered under another family; write dropped"
            );
            return;
        }

        let entry = self
            .series
            .entry((name.to_string(), labels.to_string()))
            .or_insert_with(|| Series::new(family));
        f(entry.value());
    }

    /// Increment a counter by 1.
    pub fn increment_counter(&self, name: &str, labels: &str) {
        self.with_series(name, labels, Family::Counter, |s| {
            if let Series::Counter(v) = s {
                v.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    /// Add `value` truncated to an unsigned integer (negative values add 0).
    pub fn add_to_counter(&self, name: &str, value: f64, labels: &str) {
        self.with_series(name, labels, Family::Counter, |s| {
            if let Series::Counter(v) = s {
                v.fetch_add(value as u64, Ordering::Relaxed);
            }
        });
    }

    pub fn observe_histogram(&self, name: &str, value: f64, labels: &str) {
        self.with_series(name, labels, Family::Histogram, |s| {
            if let Series::Histogram(h) = s {
                h.observe(value);
            }
        });
    }

    /// Last writer wins.
    pub fn set_gauge(&self, name: &str, value: f64, labels: &str) {
        self.with_series(name, labels, Family::Gauge, |s| {
            if let Series::Gauge(bits) = s {
                bits.store(value.to_bits(), Ordering::Relaxed);
            }
        });
    }

    /// Start a timer that observes elapsed milliseconds into `name` when dropped.
    pub fn start_timer(&self, name: &str, labels: &str) -> ScopedTimer<'_> {
        ScopedTimer::new(self, name, labels)
    }

    /// Drop every series. Intended for tests.
    pub fn reset(&self) {
        self.series.clear();
        self.families.clear();
    }

    /// Read one series.
    pub fn sample(&self, name: &str, labels: &str) -> Option<Sample> {
        self.series
            .get(&(name.to_string(), labels.to_string()))
            .map(|s| s.snapshot())
    }

    /// All series sorted by family, name, then labels.
    pub fn samples(&self) -> Vec<(String, String, Sample)> {
        let mut out: Vec<(String, String, Sample)> = self
            .series
            .iter()
            .map(|r| {
                let (name, labels) = r.key();
                (name.clone(), labels.clone(), r.value().snapshot())
            })
            .collect();
        out.sort_by(|a, b| {
            (a.2.family(), &a.0, &a.1).cmp(&(b.2.family(), &b.0, &b.1))
        });
        out
    }

    /// Render in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        let mut current: Option<(Family, String)> = None;

        for (name, labels, sample) in self.samples() {
            let family = sample.family();
            if current.as_ref() != Some(&(family, name.clone())) {
                let _ = writeln!(out, "# HELP {} {}", name, family.help());
                let _ = writeln!(out, "# TYPE {} {}", name, family.as_str());
                current = Some((family, name.clone()));
            }

            match sample {
                Sample::Counter(v) => {
                    let _ = writeln!(out, "{}{} {}", name, braced(&labels), v);
                }
                Sample::Histogram { count, sum, buckets } => {
                    let mut cumulative = 0u64;
                    for (i, le) in BUCKET_BOUNDS.iter().enumerate() {
                        cumulative += buckets[i];
                        let _ = writeln!(
                            out,
                            "{}_bucket{} {}",
                            name,
                            braced(&with_le(&labels, &format!("{le:.6}"))),
                            cumulative
                        );
                    }
                    let _ = writeln!(out, "{}_bucket{} {}", name, braced(&with_le(&labels, "+Inf")), count);
                    let _ = writeln!(out, "{}_count{} {}", name, braced(&labels), count);
                    let _ = writeln!(out, "{}_sum{} {}", name, braced(&labels), sum);
                }
                Sample::Gauge(v) => {
                    let _ = writeln!(out, "{}{} {:.6}", name, braced(&labels), v);
                }
            }
        }
        out
    }

    /// Collapse series by name into the JSON snapshot.
    pub fn json_snapshot(&self) -> JsonMetrics {
        let mut out = JsonMetrics::default();
        for (name, _labels, sample) in self.samples() {
            match sample {
                Sample::Counter(v) => {
                    out.counters.insert(name, v);
                }
                Sample::Histogram { count, sum, .. } => {
                    out.histograms.insert(name, HistogramSummary { count, sum });
                }
                Sample::Gauge(v) => {
                    out.gauges.insert(name, v);
                }
            }
        }
        out
    }

    pub fn render_json(&self) -> String {
        serde_json::to_string(&self.json_snapshot()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "metrics json encode failed");
            "{}".to_string()
        })
    }
}

fn braced(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{labels}}}")
    }
}

fn with_le(labels: &str, le: &str) -> String {
    if labels.is_empty() {
        format!("le=\"{le}\"")
    } else {
        format!("{labels},le=\"{le}\"")
    }
}

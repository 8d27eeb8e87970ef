//! Scoped duration timer.
//!
//! Captures a start instant on construction and observes the elapsed
//! milliseconds into a histogram when dropped, so every exit path of the
//! enclosing scope (early returns, `?`, unwinding) records a timing.

use std::time::Instant;

use super::metrics::MetricsRegistry;

#[must_use = "the timer records when dropped; bind it to a named variable"]
pub struct ScopedTimer<'a> {
    registry: &'a MetricsRegistry,
    name: String,
    labels: String,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(registry: &'a MetricsRegistry, name: &str, labels: &str) -> Self {
        Self {
            registry,
            name: name.to_string(),
            labels: labels.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        self.registry
            .observe_histogram(&self.name, elapsed_ms, &self.labels);
    }
}

//! Shared application state for the fusion gateway.
//!
//! One `FusionService` and one `MetricsRegistry` per process, created at
//! startup and handed to every handler. Tests build their own instances.

use std::sync::Arc;

use crate::obs::MetricsRegistry;
use crate::services::FusionService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<FusionService>,
    metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(service: FusionService, metrics: MetricsRegistry) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(metrics),
        }
    }

    pub fn service(&self) -> &FusionService {
        &self.service
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

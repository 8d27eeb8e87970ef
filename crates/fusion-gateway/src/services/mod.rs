//! Domain services behind the HTTP adapter.

pub mod fusion;

pub use fusion::{FusionService, StatsSnapshot};

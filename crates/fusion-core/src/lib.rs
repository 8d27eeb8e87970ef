//! fusion core: transport-agnostic estimator, configuration, and error types.
//!
//! This crate defines the numeric contract of the fusion service and the error
//! surface shared with the gateway. It intentionally carries no transport or
//! runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `FusionError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod estimator;

pub use config::FusionConfig;
/// Shared result type.
pub use error::{ErrorClass, FusionError, Result};
pub use estimator::{fuse, fuse_detailed, Fusion, Method};

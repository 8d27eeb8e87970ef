//! fusion gateway library entry.
//!
//! This crate wires the metrics registry, the fusion service facade, and the
//! HTTP adapter into a cohesive service. It is intended to be consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
pub mod services;

//! Top-level facade crate for the fusion service.
//!
//! Re-exports the estimator core and the gateway library so users can depend
//! on a single crate.

pub mod core {
    pub use fusion_core::*;
}

pub mod gateway {
    pub use fusion_gateway::*;
}

pub use fusion_core::{fuse, FusionConfig};

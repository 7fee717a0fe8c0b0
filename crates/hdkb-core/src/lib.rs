//! hdkb-core: shared foundation for the hdkb knowledge-base toolkit.
//!
//! - Types: `Gate` and `Center` domain primitives, collection re-exports
//! - Errors: one `thiserror` enum per subsystem plus a pipeline aggregate
//! - Config: layered TOML configuration (CLI > env > project > user > defaults)
//! - Tracing: `HDKB_LOG`-driven subscriber setup
//! - Constants: domain totals and compiled defaults

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::HdkbConfig;
pub use errors::{HdkbErrorCode, PipelineError, PipelineResult};
pub use types::{Center, Gate};

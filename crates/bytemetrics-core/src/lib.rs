//! bytemetrics-core: shared foundation for the bytemetrics engine.
//!
//! - Errors: one `thiserror` enum per subsystem plus the pipeline aggregate
//! - Config: TOML configuration with env and CLI layering
//! - Tracing: `BYTEMETRICS_LOG` driven subscriber setup
//! - Types: key interning, node identifiers, fast collections
//! - Constants: defaults shared across crates

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::BytemetricsConfig;
pub use errors::{ErrorCode, PipelineError, PipelineResult};
pub use types::{KeyInterner, NodeId};

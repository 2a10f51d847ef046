//! Error handling for bytemetrics.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod coverage_error;
pub mod decode_error;
pub mod error_code;
pub mod hierarchy_error;
pub mod index_error;
pub mod pipeline_error;

pub use config_error::ConfigError;
pub use coverage_error::CoverageError;
pub use decode_error::DecodeError;
pub use error_code::ErrorCode;
pub use hierarchy_error::HierarchyError;
pub use index_error::IndexError;
pub use pipeline_error::{PipelineError, PipelineResult};

//! Pipeline errors and non-fatal error collection.

use super::error_code::ErrorCode;
use super::{ConfigError, DecodeError, HierarchyError, IndexError};

/// Errors that can occur during an analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Decode error in {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: DecodeError,
    },

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Attach the artifact origin to a decode failure.
    pub fn decode(origin: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            origin: origin.into(),
            source,
        }
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Decode { source, .. } => source.error_code(),
            Self::Index(e) => e.error_code(),
            Self::Hierarchy(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some artifacts fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

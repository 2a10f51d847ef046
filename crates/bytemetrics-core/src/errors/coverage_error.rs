//! Coverage session errors.

use super::error_code::{self, ErrorCode};

/// Errors raised by the coverage session controller.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("Cannot start {requested}: session {active} is still open")]
    SessionAlreadyActive { active: String, requested: String },

    #[error("Cannot finish {name}: no coverage session is open")]
    NoActiveSession { name: String },

    #[error("Cannot finish {requested}: the open session is {active}")]
    SessionMismatch { active: String, requested: String },

    #[error("Coverage agent unavailable: {message}")]
    AgentUnavailable { message: String },

    #[error("Coverage dump failed for {name}: {source}")]
    DumpFailed {
        name: String,
        source: std::io::Error,
    },
}

impl ErrorCode for CoverageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AgentUnavailable { .. } | Self::DumpFailed { .. } => {
                error_code::COVERAGE_AGENT_ERROR
            }
            _ => error_code::COVERAGE_SESSION_ERROR,
        }
    }
}

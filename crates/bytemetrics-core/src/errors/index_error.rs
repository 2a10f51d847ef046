//! Unit index errors.

use super::error_code::{self, ErrorCode};

/// Errors raised when registering nodes in the unit index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("Key already registered: {key}")]
    DuplicateKey { key: String },

    #[error("{key} is owned by {existing}, cannot move it under {requested}")]
    OwnershipConflict {
        key: String,
        existing: String,
        requested: String,
    },
}

impl ErrorCode for IndexError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => error_code::DUPLICATE_KEY,
            Self::OwnershipConflict { .. } => error_code::OWNERSHIP_CONFLICT,
        }
    }
}

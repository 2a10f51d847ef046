//! Inheritance hierarchy errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while resolving inheritance relations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("Cyclic inheritance hierarchy at {key}: {}", .path.join(" -> "))]
    CyclicHierarchy { key: String, path: Vec<String> },
}

impl ErrorCode for HierarchyError {
    fn error_code(&self) -> &'static str {
        error_code::CYCLIC_HIERARCHY
    }
}

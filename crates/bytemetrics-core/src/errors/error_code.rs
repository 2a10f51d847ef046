//! ErrorCode trait for structured error reporting.

/// Trait giving every bytemetrics error a stable, machine-readable code.
/// Reporting layers match on the code instead of the message text.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "DECODE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted report string: `[ERROR_CODE] message`.
    fn report_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const DECODE_ERROR: &str = "DECODE_ERROR";
pub const ARTIFACT_TOO_LARGE: &str = "ARTIFACT_TOO_LARGE";
pub const DUPLICATE_KEY: &str = "DUPLICATE_KEY";
pub const OWNERSHIP_CONFLICT: &str = "OWNERSHIP_CONFLICT";
pub const CYCLIC_HIERARCHY: &str = "CYCLIC_HIERARCHY";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const COVERAGE_SESSION_ERROR: &str = "COVERAGE_SESSION_ERROR";
pub const COVERAGE_AGENT_ERROR: &str = "COVERAGE_AGENT_ERROR";

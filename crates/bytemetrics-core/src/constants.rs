//! Shared constants for the bytemetrics engine.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Magic number opening every class file.
pub const CLASS_FILE_MAGIC: u32 = 0xCAFE_BABE;

/// Largest artifact accepted by the decoder unless configured (16 MiB).
pub const DEFAULT_MAX_ARTIFACT_SIZE: u64 = 16 * 1024 * 1024;

/// Extension appended to the outer unit name when a class file carries no
/// `SourceFile` attribute.
pub const DEFAULT_FALLBACK_SOURCE_EXTENSION: &str = "java";

/// Default number of worker threads (0 = rayon decides).
pub const DEFAULT_THREADS: usize = 0;

/// Package key used for units declared outside any package.
pub const DEFAULT_PACKAGE_KEY: &str = "[default]";

/// Project config file name looked up in the analysis root.
pub const PROJECT_CONFIG_FILE: &str = "bytemetrics.toml";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "BYTEMETRICS_LOG";

/// Filter used when `BYTEMETRICS_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "bytemetrics=info";

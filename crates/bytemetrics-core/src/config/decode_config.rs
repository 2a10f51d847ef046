//! Decoder configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FALLBACK_SOURCE_EXTENSION, DEFAULT_MAX_ARTIFACT_SIZE};

/// Configuration for the class-file decoder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DecodeConfig {
    /// Largest artifact accepted, in bytes. Default: 16 MiB.
    pub max_artifact_size: Option<u64>,
    /// Extension used to build a file key when `SourceFile` is missing. Default: "java".
    pub fallback_source_extension: Option<String>,
}

impl DecodeConfig {
    /// Returns the effective artifact size limit.
    pub fn effective_max_artifact_size(&self) -> u64 {
        self.max_artifact_size.unwrap_or(DEFAULT_MAX_ARTIFACT_SIZE)
    }

    /// Returns the effective fallback extension, without a leading dot.
    pub fn effective_fallback_source_extension(&self) -> &str {
        self.fallback_source_extension
            .as_deref()
            .map(|ext| ext.trim_start_matches('.'))
            .unwrap_or(DEFAULT_FALLBACK_SOURCE_EXTENSION)
    }
}

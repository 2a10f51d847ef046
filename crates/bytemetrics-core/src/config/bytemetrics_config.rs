//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, DecodeConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`BYTEMETRICS_*`)
/// 3. Project config (`bytemetrics.toml` in the analysis root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BytemetricsConfig {
    pub decode: DecodeConfig,
    pub analysis: AnalysisConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_artifact_size: Option<u64>,
    pub threads: Option<usize>,
    pub coupling_includes_inheritance: Option<bool>,
}

impl BytemetricsConfig {
    /// Load configuration rooted at `root` with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &BytemetricsConfig) -> Result<(), ConfigError> {
        if config.decode.max_artifact_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "decode.max_artifact_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ext) = &config.decode.fallback_source_extension {
            if ext.trim_start_matches('.').is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "decode.fallback_source_extension".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut BytemetricsConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: BytemetricsConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut BytemetricsConfig, other: &BytemetricsConfig) {
        if other.decode.max_artifact_size.is_some() {
            base.decode.max_artifact_size = other.decode.max_artifact_size;
        }
        if other.decode.fallback_source_extension.is_some() {
            base.decode.fallback_source_extension =
                other.decode.fallback_source_extension.clone();
        }

        if other.analysis.threads.is_some() {
            base.analysis.threads = other.analysis.threads;
        }
        if other.analysis.coupling_includes_inheritance.is_some() {
            base.analysis.coupling_includes_inheritance =
                other.analysis.coupling_includes_inheritance;
        }
        if other.analysis.lcom4_blocks.is_some() {
            base.analysis.lcom4_blocks = other.analysis.lcom4_blocks;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `BYTEMETRICS_DECODE_MAX_ARTIFACT_SIZE`, `BYTEMETRICS_ANALYSIS_THREADS`, etc.
    fn apply_env_overrides(config: &mut BytemetricsConfig) {
        if let Ok(val) = std::env::var("BYTEMETRICS_DECODE_MAX_ARTIFACT_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.decode.max_artifact_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("BYTEMETRICS_DECODE_FALLBACK_SOURCE_EXTENSION") {
            config.decode.fallback_source_extension = Some(val);
        }
        if let Ok(val) = std::env::var("BYTEMETRICS_ANALYSIS_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.analysis.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("BYTEMETRICS_ANALYSIS_COUPLING_INCLUDES_INHERITANCE") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.coupling_includes_inheritance = Some(v);
            }
        }
        if let Ok(val) = std::env::var("BYTEMETRICS_ANALYSIS_LCOM4_BLOCKS") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.lcom4_blocks = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut BytemetricsConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_artifact_size {
            config.decode.max_artifact_size = Some(v);
        }
        if let Some(v) = cli.threads {
            config.analysis.threads = Some(v);
        }
        if let Some(v) = cli.coupling_includes_inheritance {
            config.analysis.coupling_includes_inheritance = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

//! Configuration system for bytemetrics.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod analysis_config;
pub mod bytemetrics_config;
pub mod decode_config;

pub use analysis_config::AnalysisConfig;
pub use bytemetrics_config::{BytemetricsConfig, CliOverrides};
pub use decode_config::DecodeConfig;

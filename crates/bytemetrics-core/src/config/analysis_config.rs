//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THREADS;

/// Configuration for graph construction and metric computation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Worker threads for decoding and metrics. 0 = rayon default.
    pub threads: Option<usize>,
    /// Count EXTENDS/IMPLEMENTS edges in CA/CE as well as USES. Default: false.
    pub coupling_includes_inheritance: Option<bool>,
    /// Record LCOM4 witness blocks. Default: true.
    pub lcom4_blocks: Option<bool>,
}

impl AnalysisConfig {
    /// Returns the effective thread count, 0 meaning "let rayon decide".
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }

    /// Returns whether inheritance edges count towards CA/CE.
    pub fn effective_coupling_includes_inheritance(&self) -> bool {
        self.coupling_includes_inheritance.unwrap_or(false)
    }

    /// Returns whether LCOM4 blocks are recorded.
    pub fn effective_lcom4_blocks(&self) -> bool {
        self.lcom4_blocks.unwrap_or(true)
    }
}

//! End-to-end run: decode → register → build graph → finish → metrics.

use std::time::Instant;

use bytemetrics_core::config::BytemetricsConfig;
use bytemetrics_core::errors::{DecodeError, PipelineError, PipelineResult};
use bytemetrics_core::tracing::fields;
use rayon::prelude::*;

use super::analysis::Analysis;
use super::layout::{BytecodeLayout, KeyLayout};
use crate::classfile::{ClassDecoder, DecodedUnit};
use crate::graph::GraphBuilder;
use crate::index::UnitIndex;
use crate::metrics::MetricEngine;

/// One compiled artifact handed to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Where the bytes came from; only used in error reports.
    pub origin: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(origin: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            origin: origin.into(),
            bytes: bytes.into(),
        }
    }
}

/// Runs the analysis pipeline. Holds no per-run state, so one analyzer can
/// serve any number of runs.
pub struct Analyzer {
    config: BytemetricsConfig,
    decoder: ClassDecoder,
    layout: Box<dyn KeyLayout>,
    engine: MetricEngine,
}

impl Analyzer {
    pub fn new(config: BytemetricsConfig) -> Self {
        Self {
            decoder: ClassDecoder::new(&config.decode),
            layout: Box::new(BytecodeLayout::new(&config.decode)),
            engine: MetricEngine::new(&config.analysis),
            config,
        }
    }

    /// Replace the default bytecode-derived key layout.
    pub fn with_layout(mut self, layout: impl KeyLayout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    pub fn config(&self) -> &BytemetricsConfig {
        &self.config
    }

    /// Analyze `artifacts`. Failures of single artifacts are collected as
    /// non-fatal errors; everything else still lands in the result.
    pub fn analyze(&self, artifacts: &[Artifact]) -> PipelineResult<Analysis> {
        let threads = self.config.analysis.effective_threads();
        if threads == 0 {
            return self.run(artifacts);
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| self.run(artifacts)),
            Err(error) => {
                tracing::warn!(%error, threads, "falling back to the global thread pool");
                self.run(artifacts)
            }
        }
    }

    fn run(&self, artifacts: &[Artifact]) -> PipelineResult<Analysis> {
        let span = tracing::info_span!("analyze", { fields::ARTIFACT_COUNT } = artifacts.len());
        let _guard = span.enter();
        let mut result = PipelineResult::default();

        let decode_start = Instant::now();
        let decoded: Vec<Result<DecodedUnit, DecodeError>> = artifacts
            .par_iter()
            .map(|artifact| self.decoder.decode(&artifact.bytes))
            .collect();
        let decode_duration_ms = decode_start.elapsed().as_millis() as u64;

        let graph_start = Instant::now();
        let mut index = UnitIndex::new();
        let mut builder = GraphBuilder::new();
        let mut units_registered = 0usize;

        for (artifact, outcome) in artifacts.iter().zip(decoded) {
            let unit = match outcome {
                Ok(unit) => unit,
                Err(error) => {
                    tracing::warn!(origin = %artifact.origin, %error, "skipping undecodable artifact");
                    result.add_error(PipelineError::decode(&artifact.origin, error));
                    continue;
                }
            };

            let location = self.layout.locate(&unit);
            let references = unit.references.clone();
            match index.register(unit, &location.file, &location.package) {
                Ok(_) => units_registered += 1,
                Err(error) => {
                    tracing::warn!(origin = %artifact.origin, %error, "unit not registered");
                    result.add_error(error.into());
                    continue;
                }
            }
            for reference in &references {
                builder.add_reference(&index, reference);
            }
        }

        let graph = builder.finish(&index);
        let graph_build_time_ms = graph_start.elapsed().as_millis() as u64;

        let metrics_start = Instant::now();
        let metrics = self.engine.compute(&index, &graph);
        let metrics_compute_time_ms = metrics_start.elapsed().as_millis() as u64;

        let mut failures: Vec<_> = metrics
            .iter()
            .filter_map(|(id, m)| m.failure.clone().map(|f| (index.key(*id).to_string(), f)))
            .collect();
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, failure) in failures {
            result.add_error(failure.into());
        }

        tracing::info!(
            { fields::UNITS_REGISTERED } = units_registered,
            { fields::DECODE_DURATION } = decode_duration_ms,
            { fields::GRAPH_BUILD_TIME } = graph_build_time_ms,
            { fields::METRICS_COMPUTE_TIME } = metrics_compute_time_ms,
            { fields::UNRESOLVED_REFERENCES } = graph.stats.unresolved,
            errors = result.error_count(),
            "analysis complete"
        );

        result.data = Analysis::new(index, graph, metrics);
        result
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(BytemetricsConfig::default())
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("decoder", &self.decoder)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

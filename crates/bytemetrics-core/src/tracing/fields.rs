//! Structured span field names shared by all bytemetrics subsystems.

/// Decoder: number of artifacts handed to the pipeline.
pub const ARTIFACT_COUNT: &str = "artifact_count";

/// Decoder: decode phase duration in milliseconds.
pub const DECODE_DURATION: &str = "decode_duration_ms";

/// Index: units registered in this run.
pub const UNITS_REGISTERED: &str = "units_registered";

/// Graph: references dropped because an endpoint was never registered.
pub const UNRESOLVED_REFERENCES: &str = "unresolved_references";

/// Graph: graph construction time in milliseconds.
pub const GRAPH_BUILD_TIME: &str = "graph_build_time_ms";

/// Metrics: metric computation time in milliseconds.
pub const METRICS_COMPUTE_TIME: &str = "metrics_compute_time_ms";

//! Object-oriented design metrics.
//!
//! RFC, DIT, NOC, LCOM4 (with witness blocks), CA and CE, computed with the
//! same definitions at unit, file and package granularity.

pub mod coupling;
pub mod engine;
pub mod lcom4;
pub mod rfc;
pub mod types;

pub use coupling::{compute_coupling, CouplingCounts};
pub use engine::MetricEngine;
pub use lcom4::{cohesion_graph, lcom4, CohesionGraph};
pub use rfc::response_for_class;
pub use types::{Metric, MetricsTable, NodeMetrics};

//! Dependency graph: unit edges from decoded references, rolled up to
//! files and packages.

pub mod aggregation;
pub mod builder;
pub mod dependency_graph;
pub mod types;

pub use builder::GraphBuilder;
pub use dependency_graph::DependencyGraph;
pub use types::{AddOutcome, BuildStats, DependencyEdge, Edge, GraphNode, UsageKind};

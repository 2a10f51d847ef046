//! bytemetrics-analysis: static analysis of JVM class files.
//!
//! Pipeline: decode (parallel) → register in the unit index → feed
//! references into the graph builder → finish → hierarchy + metrics.
//!
//! - `classfile`: class-file decoder, zero knowledge of other units
//! - `index`: unit → file → package ownership tree with one key space
//! - `graph`: weighted EXTENDS/IMPLEMENTS/USES edges at all three levels
//! - `hierarchy`: ancestors, children and depth over inheritance edges
//! - `metrics`: RFC, DIT, NOC, LCOM4, CA, CE
//! - `pipeline`: `Analyzer` and the `Analysis` query surface

pub mod classfile;
pub mod graph;
pub mod hierarchy;
pub mod index;
pub mod metrics;
pub mod pipeline;

pub use classfile::{decode, ClassDecoder, DecodedUnit, RawReference, ReferenceKind};
pub use graph::{DependencyGraph, Edge, GraphBuilder, UsageKind};
pub use hierarchy::HierarchyResolver;
pub use index::{Granularity, UnitIndex};
pub use metrics::{Metric, MetricEngine};
pub use pipeline::{Analysis, Analyzer, Artifact, BytecodeLayout, KeyLayout, UnitLocation};

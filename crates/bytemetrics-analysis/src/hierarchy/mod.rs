//! Hierarchy resolver: ancestors, children and depth over inheritance edges.

pub mod resolver;

pub use resolver::HierarchyResolver;

//! Unit index: the unit → file → package ownership tree.

pub mod registry;
pub mod types;

pub use registry::UnitIndex;
pub use types::{Granularity, IndexedNode};

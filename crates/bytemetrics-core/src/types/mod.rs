//! Data structures and key interning for bytemetrics.
//! FxHashMap, SmallVec2, lasso-based interning, Spur-based ID types.

pub mod collections;
pub mod identifiers;
pub mod interning;

pub use collections::{FxHashMap, FxHashSet, SmallVec2};
pub use identifiers::NodeId;
pub use interning::KeyInterner;

//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};

/// Inline storage for implemented contracts (usually fewer than 2).
pub type SmallVec2<T> = smallvec::SmallVec<[T; 2]>;

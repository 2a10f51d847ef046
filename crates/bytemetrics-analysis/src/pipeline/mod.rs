//! Pipeline orchestration and the query surface of a finished run.

pub mod analysis;
pub mod analyzer;
pub mod layout;

pub use analysis::Analysis;
pub use analyzer::{Analyzer, Artifact};
pub use layout::{BytecodeLayout, KeyLayout, UnitLocation};

//! Seam to the instrumentation agent that owns the execution counters.

use std::io;
use std::sync::Arc;

/// Runtime handle of a coverage agent.
pub trait CoverageAgent: Send + Sync {
    /// Name the session the next dump is recorded under.
    fn set_session_id(&self, id: &str) -> io::Result<()>;

    /// Clear every execution counter.
    fn reset(&self) -> io::Result<()>;

    /// Write the current counters out, clearing them if `reset` is set.
    fn dump(&self, reset: bool) -> io::Result<()>;
}

impl<A: CoverageAgent + ?Sized> CoverageAgent for Arc<A> {
    fn set_session_id(&self, id: &str) -> io::Result<()> {
        (**self).set_session_id(id)
    }

    fn reset(&self) -> io::Result<()> {
        (**self).reset()
    }

    fn dump(&self, reset: bool) -> io::Result<()> {
        (**self).dump(reset)
    }
}

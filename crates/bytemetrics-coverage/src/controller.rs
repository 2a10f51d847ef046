//! Test-scoped coverage sessions.

use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};

use bytemetrics_core::errors::CoverageError;

use crate::agent::CoverageAgent;

/// Prefix of the message reported when no agent can be reached.
pub const AGENT_UNAVAILABLE: &str =
    "unable to access the coverage agent; make sure the test JVM runs with a compatible agent attached";

/// Opens one coverage session per test and dumps it when the test ends.
///
/// At most one session is open at a time.
#[derive(Debug)]
pub struct CoverageController<A: CoverageAgent> {
    agent: A,
    active: Mutex<Option<String>>,
}

impl<A: CoverageAgent> CoverageController<A> {
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            active: Mutex::new(None),
        }
    }

    /// Build the controller from a fallible agent lookup.
    pub fn connect<F, E>(factory: F) -> Result<Self, CoverageError>
    where
        F: FnOnce() -> Result<A, E>,
        E: Display,
    {
        match factory() {
            Ok(agent) => Ok(Self::new(agent)),
            Err(error) => {
                tracing::error!(%error, "coverage agent lookup failed");
                Err(CoverageError::AgentUnavailable {
                    message: format!("{AGENT_UNAVAILABLE}: {error}"),
                })
            }
        }
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// Name of the open session, if any.
    pub fn active_session(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Open the session `name`: name the agent's session and clear its
    /// counters. If the agent rejects either call no session is opened,
    /// though the agent may already carry the new session id.
    pub fn on_test_start(&self, name: &str) -> Result<(), CoverageError> {
        let mut active = self.lock();
        if let Some(open) = active.as_ref() {
            return Err(CoverageError::SessionAlreadyActive {
                active: open.clone(),
                requested: name.to_string(),
            });
        }

        self.agent
            .set_session_id(name)
            .and_then(|()| self.agent.reset())
            .map_err(|error| CoverageError::AgentUnavailable {
                message: error.to_string(),
            })?;

        *active = Some(name.to_string());
        tracing::info!(test = name, "test started");
        Ok(())
    }

    /// Dump and reset the counters of session `name`, then close it. The
    /// session is closed even if the dump fails.
    pub fn on_test_finish(&self, name: &str) -> Result<(), CoverageError> {
        let mut active = self.lock();
        match active.as_deref() {
            None => {
                return Err(CoverageError::NoActiveSession {
                    name: name.to_string(),
                })
            }
            Some(open) if open != name => {
                return Err(CoverageError::SessionMismatch {
                    active: open.to_string(),
                    requested: name.to_string(),
                })
            }
            Some(_) => {}
        }

        *active = None;
        tracing::info!(test = name, "test finished");
        self.agent.dump(true).map_err(|source| {
            tracing::warn!(test = name, error = %source, "coverage dump failed");
            CoverageError::DumpFailed {
                name: name.to_string(),
                source,
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // Poisoning ignored: the name is always written whole.
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//! bytemetrics-coverage: per-test coverage sessions.
//!
//! A test runner calls [`CoverageController::on_test_start`] and
//! [`CoverageController::on_test_finish`] around every test; the controller
//! names the agent's session after the test, clears counters on start and
//! dumps them on finish.

pub mod agent;
pub mod controller;

pub use agent::CoverageAgent;
pub use controller::CoverageController;

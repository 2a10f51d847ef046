//! Tests for the tracing setup.

use std::sync::Mutex;

use bytemetrics_core::tracing::setup::init_tracing;

/// Serializes tests that manipulate `BYTEMETRICS_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_log_filter_from_env() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("BYTEMETRICS_LOG", "bytemetrics_analysis=debug");
    init_tracing();
    std::env::remove_var("BYTEMETRICS_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    tracing::info!(target: "bytemetrics", "still alive");
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("BYTEMETRICS_LOG", "=====not a filter[");
    init_tracing();
    std::env::remove_var("BYTEMETRICS_LOG");
}

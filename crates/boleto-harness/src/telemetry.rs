// crates/boleto-harness/src/telemetry.rs
// ============================================================================
// Module: Harness Telemetry
// Description: tracing subscriber setup for harness consumers.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! Installs a compact fmt subscriber filtered by `RUST_LOG` (default `info`).
//! Test binaries call [`init_tracing`] from many tests, so a second install
//! is a no-op rather than a panic.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Installs the global subscriber once; later calls return false.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy(),
        )
        // test runners already prefix output per test
        .with_target(false)
        .without_time()
        .with_test_writer()
        .try_init()
        .is_ok()
}

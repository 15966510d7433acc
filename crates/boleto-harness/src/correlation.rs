// crates/boleto-harness/src/correlation.rs
// ============================================================================
// Module: Correlation Identifiers
// Description: Fresh correlation ids for orchestrator calls.
// Dependencies: uuid
// ============================================================================

//! ## Overview
//! The orchestrator uses `X-Correlation-ID` for tracing and as a duplicate
//! detection key: replaying an id on an otherwise identical register or
//! cancel call is rejected. Every logical attempt therefore needs a new id.

use uuid::Uuid;

/// Returns a random UUID v4 string.
#[must_use]
pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns `count` distinct correlation ids.
#[must_use]
pub fn new_correlation_ids(count: usize) -> Vec<String> {
    (0 .. count).map(|_| new_correlation_id()).collect()
}

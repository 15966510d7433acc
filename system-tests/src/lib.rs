// system-tests/src/lib.rs
// ============================================================================
// Module: Boleto System Tests Library
// Description: Shared configuration for live orchestrator suites.
// Purpose: Provide common utilities for the boleto system-test binaries.
// Dependencies: boleto-client, boleto-harness
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the live suites in
//! `system-tests/tests`. The suites talk to a real orchestrator and are
//! gated behind the `system-tests` feature.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

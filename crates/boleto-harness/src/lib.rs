// crates/boleto-harness/src/lib.rs
// ============================================================================
// Module: Boleto Harness Library
// Description: Test-data builders and orchestration for boleto API testing.
// Purpose: Drive the orchestrator through eventual-consistency and load flows.
// Dependencies: boleto-client, rand, regex, tokio, tracing, uuid
// ============================================================================

//! ## Overview
//! Boleto Harness sits on top of [`boleto_client::BoletoApi`] and provides:
//! - unique payload generation with checksum-valid CPF/CNPJ numbers,
//! - bounded polling for asynchronously created boletos,
//! - concurrent register-then-verify batches with an aggregate success gate,
//! - assertion helpers that render full HTTP diagnostics.
//!
//! Invariants:
//! - Non-2xx statuses are inspected as data; only assertion helpers and the
//!   load gate turn them into errors.
//! - Batch aggregation happens after every spawned branch has settled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assertions;
pub mod batch;
pub mod builder;
pub mod correlation;
pub mod document;
pub mod error;
pub mod polling;
pub mod telemetry;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assertions::ApiAssertionError;
pub use assertions::duplicate_detection_pattern;
pub use assertions::ensure_code;
pub use assertions::ensure_correlation_id;
pub use assertions::ensure_message_contains;
pub use assertions::ensure_message_matches;
pub use assertions::ensure_status;
pub use assertions::ensure_success;
pub use assertions::validate_boleto_record;
pub use batch::LoadProfile;
pub use batch::LoadReport;
pub use batch::LoadScenarioError;
pub use batch::LoadSummary;
pub use batch::RegisteredBoleto;
pub use batch::RegistrationFailure;
pub use batch::RegistrationPhase;
pub use batch::VerificationOutcome;
pub use batch::VerificationPhase;
pub use batch::register_batch;
pub use batch::run_load_scenario;
pub use batch::verify_batch;
pub use builder::RequiredField;
pub use builder::TestDataBuilder;
pub use builder::generate_external_id;
pub use correlation::new_correlation_id;
pub use correlation::new_correlation_ids;
pub use document::generate_cnpj;
pub use document::generate_cpf;
pub use document::is_valid_cnpj;
pub use document::is_valid_cpf;
pub use error::ConfigError;
pub use polling::PollOutcome;
pub use polling::PollStatus;
pub use polling::QueryAttempt;
pub use polling::RetryPolicy;
pub use polling::poll_query;
pub use polling::poll_until;

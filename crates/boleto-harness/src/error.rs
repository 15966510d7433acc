// crates/boleto-harness/src/error.rs
// ============================================================================
// Module: Harness Configuration Errors
// Description: Validation failures for retry and load settings.
// Purpose: Reject settings that would make orchestration meaningless.
// Dependencies: thiserror
// ============================================================================

//! Validation errors for retry and load settings.

use thiserror::Error;

/// Invalid orchestration setting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Retry policy allows no attempts.
    #[error("retry policy requires at least one attempt")]
    ZeroAttempts,
    /// Load profile launches no registrations.
    #[error("load profile batch size must be greater than zero")]
    ZeroBatchSize,
    /// Success ratio threshold lies outside `[0, 1]`.
    #[error("min success ratio must be within [0, 1], got {0}")]
    RatioOutOfRange(f64),
}

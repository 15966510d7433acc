// crates/boleto-client/src/error.rs
// ============================================================================
// Module: Boleto Client Errors
// Description: Failure modes that prevent a request from producing a result.
// Purpose: Separate transport/configuration failures from HTTP outcomes.
// Dependencies: reqwest, thiserror
// ============================================================================

//! ## Overview
//! [`ClientError`] is reserved for failures where no HTTP status exists to
//! report. A 4xx or 5xx response is never a [`ClientError`].

use thiserror::Error;

/// Errors returned by the boleto client before or while talking to the server.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - No variant carries an HTTP status; statuses travel in `HttpResult`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL failed to parse or is not absolute.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Endpoint URL could not be assembled.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    /// Header name or value is not valid on the wire.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Offending header name.
        name: String,
        /// Parser rejection reason.
        reason: String,
    },
    /// Request payload failed to serialize.
    #[error("payload encoding failure: {0}")]
    Encode(String),
    /// HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(String),
    /// Network, DNS, TLS, or timeout failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Returns true when the failure came from the network layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

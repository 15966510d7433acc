// crates/boleto-client/src/headers.rs
// ============================================================================
// Module: Boleto API Headers
// Description: Ordered header sets for register, query, and cancel calls.
// Purpose: Build the required headers while allowing deliberate omissions.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The orchestrator requires a correlation header on every call and a
//! processing-mode header on register and cancel. The two processing-mode
//! headers are spelled differently (`Tipo-processamento` vs
//! `TipoProcessamento`); [`ApiHeaders`] constructors pick the right one.
//! Invariants:
//! - Values are forwarded verbatim; no normalization is applied.
//! - Header names compare case-insensitively for replacement and removal.

use std::fmt;

// ============================================================================
// SECTION: Header Names
// ============================================================================

/// Content type header name.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
/// JSON content type value sent on every call.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Caller-supplied correlation identifier header.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";
/// Processing-mode header used by the register endpoint.
pub const REGISTER_PROCESSING_HEADER: &str = "Tipo-processamento";
/// Processing-mode header used by the cancel endpoint.
pub const CANCEL_PROCESSING_HEADER: &str = "TipoProcessamento";

// ============================================================================
// SECTION: Processing Mode
// ============================================================================

/// Processing intent for register and cancel calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessingMode {
    /// Synchronous processing.
    #[default]
    Online,
    /// Batch processing.
    Batch,
}

impl ProcessingMode {
    /// Returns the wire value for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Batch => "BATCH",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Header Set
// ============================================================================

/// Ordered set of request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiHeaders {
    /// Header entries in insertion order.
    entries: Vec<(String, String)>,
}

impl ApiHeaders {
    /// Creates an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header set holding only the JSON content type.
    #[must_use]
    pub fn json() -> Self {
        Self::new().with(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
    }

    /// Headers required by the register endpoint.
    #[must_use]
    pub fn register(correlation_id: &str, mode: ProcessingMode) -> Self {
        Self::json()
            .with(CORRELATION_ID_HEADER, correlation_id)
            .with(REGISTER_PROCESSING_HEADER, mode.as_str())
    }

    /// Headers required by the query endpoint.
    #[must_use]
    pub fn query(correlation_id: &str) -> Self {
        Self::json().with(CORRELATION_ID_HEADER, correlation_id)
    }

    /// Headers required by the cancel endpoint.
    #[must_use]
    pub fn cancel(correlation_id: &str, mode: ProcessingMode) -> Self {
        Self::json()
            .with(CORRELATION_ID_HEADER, correlation_id)
            .with(CANCEL_PROCESSING_HEADER, mode.as_str())
    }

    /// Sets a header, replacing any existing entry with the same name.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            entry.1 = value.to_string();
        } else {
            self.entries.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Removes a header by name.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.entries.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self
    }

    /// Returns the value for a header name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the correlation identifier, when present.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.get(CORRELATION_ID_HEADER)
    }

    /// Iterates over header entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of header entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no headers are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

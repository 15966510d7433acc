// crates/boleto-client/src/lib.rs
// ============================================================================
// Module: Boleto Client Library
// Description: Typed HTTP client for the boleto orchestrator API.
// Purpose: Issue register/query/cancel calls and normalize every response.
// Dependencies: reqwest, serde, serde_json, rust_decimal, time, url
// ============================================================================

//! ## Overview
//! Boleto Client wraps the three orchestrator endpoints behind the
//! [`BoletoApi`] trait and ships the reqwest-backed [`BoletoOrchestratorClient`].
//! Invariants:
//! - A response with any status code is returned as an [`HttpResult`]; only
//!   transport, encoding, and configuration failures surface as [`ClientError`].
//! - Non-JSON response bodies decode to an empty JSON object.
//! - The effective request URL is recorded on every result.
//! - Header names and values are sent exactly as supplied.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod headers;
pub mod model;
pub mod response;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::BoletoApi;
pub use client::BoletoOrchestratorClient;
pub use client::CANCEL_PATH;
pub use client::ClientSettings;
pub use client::QUERY_PATH;
pub use client::REGISTER_PATH;
pub use error::ClientError;
pub use headers::ApiHeaders;
pub use headers::CANCEL_PROCESSING_HEADER;
pub use headers::CONTENT_TYPE_HEADER;
pub use headers::CORRELATION_ID_HEADER;
pub use headers::JSON_CONTENT_TYPE;
pub use headers::ProcessingMode;
pub use headers::REGISTER_PROCESSING_HEADER;
pub use model::Address;
pub use model::ApiErrorEnvelope;
pub use model::ApiSuccessEnvelope;
pub use model::BoletoEvent;
pub use model::BoletoRecord;
pub use model::BoletoTerms;
pub use model::CancelBoletoRequest;
pub use model::CancelBoletoResponse;
pub use model::DocumentType;
pub use model::FieldError;
pub use model::Payer;
pub use model::QueryBoletoParams;
pub use model::QueryBoletoResponse;
pub use model::RegisterBoletoRequest;
pub use model::RegisterBoletoResponse;
pub use response::ApiBody;
pub use response::HttpResult;
pub use response::StatusCode;

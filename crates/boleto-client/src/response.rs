// crates/boleto-client/src/response.rs
// ============================================================================
// Module: Uniform HTTP Result
// Description: Status, decoded body, and request URL for every API call.
// Purpose: Turn any HTTP response into data the caller can assert on.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpResult`] is produced for every response regardless of status.
//! Decoding is a pure step ([`HttpResult::from_parts`]) so it can be
//! exercised without a network.
//! Invariants:
//! - `ok` is true exactly when the status is in the 2xx range.
//! - 2xx bodies decode as the operation's success type, other statuses as
//!   [`ApiErrorEnvelope`]; a body matching neither is kept as raw JSON.
//! - A body that is not JSON (or is empty) is treated as `{}`.

use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::model::ApiErrorEnvelope;

pub use reqwest::StatusCode;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody<T> {
    /// 2xx body matching the operation's success shape.
    Success(T),
    /// Non-2xx body matching the error envelope.
    Error(ApiErrorEnvelope),
    /// JSON that matched neither shape (includes the empty-object fallback).
    Unrecognized(Value),
}

/// Uniform result of an orchestrator call.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResult<T> {
    /// Response status code.
    pub status: StatusCode,
    /// True for 2xx statuses.
    pub ok: bool,
    /// Typed view of the body.
    pub body: ApiBody<T>,
    /// Raw JSON body (or `{}` when the body was not JSON).
    pub raw_body: Value,
    /// Effective request URL, including the query string.
    pub request_url: String,
}

impl<T: DeserializeOwned> HttpResult<T> {
    /// Builds a result from a status, raw body bytes, and the request URL.
    #[must_use]
    pub fn from_parts(status: StatusCode, bytes: &[u8], request_url: impl Into<String>) -> Self {
        let raw_body = decode_json_or_empty(bytes);
        let ok = status.is_success();
        let body = if ok {
            serde_json::from_value::<T>(raw_body.clone())
                .map_or_else(|_| ApiBody::Unrecognized(raw_body.clone()), ApiBody::Success)
        } else {
            serde_json::from_value::<ApiErrorEnvelope>(raw_body.clone())
                .map_or_else(|_| ApiBody::Unrecognized(raw_body.clone()), ApiBody::Error)
        };
        Self {
            status,
            ok,
            body,
            raw_body,
            request_url: request_url.into(),
        }
    }
}

impl<T> HttpResult<T> {
    /// Returns the status as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the success body, when decoded.
    #[must_use]
    pub fn success(&self) -> Option<&T> {
        match &self.body {
            ApiBody::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error envelope, when decoded.
    #[must_use]
    pub fn error(&self) -> Option<&ApiErrorEnvelope> {
        match &self.body {
            ApiBody::Error(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Returns the `mensagem` field from whichever shape the body has.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.raw_body.get("mensagem").and_then(Value::as_str)
    }

    /// Returns the `codigo` field from whichever shape the body has.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        match self.raw_body.get("codigo")? {
            Value::String(code) => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            _ => None,
        }
    }

    /// Returns the `correlationId` field echoed by the server.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.raw_body.get("correlationId").and_then(Value::as_str)
    }

    /// Pretty-printed raw body for diagnostics.
    #[must_use]
    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.raw_body).unwrap_or_else(|_| self.raw_body.to_string())
    }

    /// Consumes the result and returns the success body, when decoded.
    #[must_use]
    pub fn into_success(self) -> Option<T> {
        match self.body {
            ApiBody::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Parses JSON bytes, degrading to an empty object on any failure.
fn decode_json_or_empty(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

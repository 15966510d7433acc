// crates/boleto-harness/src/assertions.rs
// ============================================================================
// Module: API Assertions
// Description: Status, message, and record checks with full HTTP diagnostics.
// Purpose: Turn unexpected responses into readable test failures.
// Dependencies: boleto-client, regex, rust_decimal, thiserror
// ============================================================================

//! ## Overview
//! Every failure message carries what is needed to debug a live run without
//! re-running it: the caller's context, expected and received status, the
//! effective request URL, and the pretty-printed body. A 404 additionally
//! hints at a misconfigured base URL, the most common cause against a fresh
//! environment.

use std::sync::OnceLock;

use boleto_client::BoletoRecord;
use boleto_client::HttpResult;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Hint appended to 404 diagnostics.
pub const NOT_FOUND_HINT: &str = "\n\n404 = Not Found: the URL above does not exist on the \
     server. Check that BASE_URL is correct and includes the API context path (for example \
     /sboot-fina-mpdp-boleto-orchestrator), and that the service is up at that base.";

/// Assertion failure with rendered diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiAssertionError {
    /// Expected a 2xx status.
    #[error(
        "{context}\nexpected: 2xx status\nreceived: status {status}\nrequest url: \
         {request_url}\nresponse body:\n{body}{hint}"
    )]
    NotSuccessful {
        /// Caller-supplied context.
        context: String,
        /// Received status.
        status: u16,
        /// Effective request URL.
        request_url: String,
        /// Pretty-printed body.
        body: String,
        /// Extra hint, empty unless the status was 404.
        hint: String,
    },
    /// Expected a specific status.
    #[error(
        "{context}\nexpected: status {expected}\nreceived: status {status}\nrequest url: \
         {request_url}\nresponse body:\n{body}"
    )]
    UnexpectedStatus {
        /// Caller-supplied context.
        context: String,
        /// Expected status.
        expected: u16,
        /// Received status.
        status: u16,
        /// Effective request URL.
        request_url: String,
        /// Pretty-printed body.
        body: String,
    },
    /// Response field did not match.
    #[error("{context}\nexpected {field} {expected}\nreceived: {received:?}\nresponse body:\n{body}")]
    FieldMismatch {
        /// Caller-supplied context.
        context: String,
        /// Field inspected.
        field: &'static str,
        /// Expectation description.
        expected: String,
        /// Received value, when present.
        received: Option<String>,
        /// Pretty-printed body.
        body: String,
    },
    /// Boleto record is missing data.
    #[error("boleto record invalid: {0}")]
    InvalidRecord(String),
}

// ============================================================================
// SECTION: Status Assertions
// ============================================================================

/// Requires a 2xx status.
///
/// # Errors
///
/// Returns [`ApiAssertionError::NotSuccessful`] for any other status.
pub fn ensure_success<T>(result: &HttpResult<T>, context: &str) -> Result<(), ApiAssertionError> {
    if result.ok {
        return Ok(());
    }
    let status = result.status_code();
    Err(ApiAssertionError::NotSuccessful {
        context: context.to_string(),
        status,
        request_url: result.request_url.clone(),
        body: result.pretty_body(),
        hint: if status == 404 { NOT_FOUND_HINT.to_string() } else { String::new() },
    })
}

/// Requires an exact status.
///
/// # Errors
///
/// Returns [`ApiAssertionError::UnexpectedStatus`] when the status differs.
pub fn ensure_status<T>(
    result: &HttpResult<T>,
    expected: u16,
    context: &str,
) -> Result<(), ApiAssertionError> {
    if result.status_code() == expected {
        return Ok(());
    }
    Err(ApiAssertionError::UnexpectedStatus {
        context: context.to_string(),
        expected,
        status: result.status_code(),
        request_url: result.request_url.clone(),
        body: result.pretty_body(),
    })
}

// ============================================================================
// SECTION: Body Assertions
// ============================================================================

/// Requires `mensagem` to contain `needle`.
///
/// # Errors
///
/// Returns [`ApiAssertionError::FieldMismatch`] when absent or not containing.
pub fn ensure_message_contains<T>(
    result: &HttpResult<T>,
    needle: &str,
    context: &str,
) -> Result<(), ApiAssertionError> {
    match result.message() {
        Some(message) if message.contains(needle) => Ok(()),
        received => Err(field_mismatch(
            result,
            context,
            "mensagem",
            format!("containing {needle:?}"),
            received.map(str::to_string),
        )),
    }
}

/// Requires `mensagem` to match `pattern`.
///
/// # Errors
///
/// Returns [`ApiAssertionError::FieldMismatch`] when absent or not matching.
pub fn ensure_message_matches<T>(
    result: &HttpResult<T>,
    pattern: &Regex,
    context: &str,
) -> Result<(), ApiAssertionError> {
    match result.message() {
        Some(message) if pattern.is_match(message) => Ok(()),
        received => Err(field_mismatch(
            result,
            context,
            "mensagem",
            format!("matching /{}/", pattern.as_str()),
            received.map(str::to_string),
        )),
    }
}

/// Requires `codigo` to equal `expected`.
///
/// # Errors
///
/// Returns [`ApiAssertionError::FieldMismatch`] when absent or different.
pub fn ensure_code<T>(
    result: &HttpResult<T>,
    expected: &str,
    context: &str,
) -> Result<(), ApiAssertionError> {
    let received = result.code();
    if received.as_deref() == Some(expected) {
        return Ok(());
    }
    Err(field_mismatch(result, context, "codigo", format!("equal to {expected:?}"), received))
}

/// Requires the echoed `correlationId` to equal `expected`.
///
/// # Errors
///
/// Returns [`ApiAssertionError::FieldMismatch`] when absent or different.
pub fn ensure_correlation_id<T>(
    result: &HttpResult<T>,
    expected: &str,
    context: &str,
) -> Result<(), ApiAssertionError> {
    let received = result.correlation_id();
    if received == Some(expected) {
        return Ok(());
    }
    Err(field_mismatch(
        result,
        context,
        "correlationId",
        format!("equal to {expected:?}"),
        received.map(str::to_string),
    ))
}

/// Builds a field mismatch carrying the pretty body.
fn field_mismatch<T>(
    result: &HttpResult<T>,
    context: &str,
    field: &'static str,
    expected: String,
    received: Option<String>,
) -> ApiAssertionError {
    ApiAssertionError::FieldMismatch {
        context: context.to_string(),
        field,
        expected,
        received,
        body: result.pretty_body(),
    }
}

/// Pattern the orchestrator uses to report duplicate registrations and cancels.
#[must_use]
#[allow(clippy::expect_used, reason = "The pattern is a compile-time constant.")]
pub fn duplicate_detection_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)duplicad|já está sendo processada").expect("valid duplicate pattern")
    })
}

// ============================================================================
// SECTION: Record Validation
// ============================================================================

/// Requires the fields every queried boleto must carry.
///
/// # Errors
///
/// Returns [`ApiAssertionError::InvalidRecord`] naming the first missing field.
pub fn validate_boleto_record(record: &BoletoRecord) -> Result<(), ApiAssertionError> {
    if record.nosso_numero.trim().is_empty() {
        return Err(ApiAssertionError::InvalidRecord("nossoNumero is empty".to_string()));
    }
    if record.valor <= Decimal::ZERO {
        return Err(ApiAssertionError::InvalidRecord(format!(
            "valor must be positive, got {}",
            record.valor
        )));
    }
    if record.data_vencimento.trim().is_empty() {
        return Err(ApiAssertionError::InvalidRecord("dataVencimento is empty".to_string()));
    }
    if record.status.trim().is_empty() {
        return Err(ApiAssertionError::InvalidRecord("status is empty".to_string()));
    }
    Ok(())
}

// crates/boleto-client/src/client.rs
// ============================================================================
// Module: Boleto Orchestrator Client
// Description: reqwest-backed implementation of the boleto API seam.
// Purpose: Send register/query/cancel requests and normalize responses.
// Dependencies: async-trait, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`BoletoApi`] is the seam the harness orchestrations are written against;
//! [`BoletoOrchestratorClient`] implements it over HTTP.
//! Invariants:
//! - Endpoint paths are appended to the configured base URL, so a context
//!   path in the base URL is preserved.
//! - Every response, whatever its status, becomes an [`HttpResult`].
//! - Headers are applied in the order supplied and are not rewritten.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::headers::ApiHeaders;
use crate::model::CancelBoletoRequest;
use crate::model::CancelBoletoResponse;
use crate::model::QueryBoletoParams;
use crate::model::QueryBoletoResponse;
use crate::model::RegisterBoletoRequest;
use crate::model::RegisterBoletoResponse;
use crate::response::HttpResult;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Register endpoint path (POST).
pub const REGISTER_PATH: &str = "/api/boletos";
/// Query endpoint path (GET).
pub const QUERY_PATH: &str = "/api/boleto";
/// Cancel endpoint path (DELETE).
pub const CANCEL_PATH: &str = "/api/boletos/cancelar";

// ============================================================================
// SECTION: API Seam
// ============================================================================

/// Boleto orchestrator operations.
///
/// # Errors
/// Implementations return `Err` only when no HTTP status is available
/// (transport, encoding, configuration). Non-2xx statuses are `Ok`.
#[async_trait]
pub trait BoletoApi: Send + Sync {
    /// Registers a boleto.
    async fn register(
        &self,
        payload: &RegisterBoletoRequest,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<RegisterBoletoResponse>, ClientError>;

    /// Queries a boleto by number.
    async fn query(
        &self,
        params: &QueryBoletoParams,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<QueryBoletoResponse>, ClientError>;

    /// Cancels a boleto by number.
    async fn cancel(
        &self,
        payload: &CancelBoletoRequest,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<CancelBoletoResponse>, ClientError>;
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// Transport settings for [`BoletoOrchestratorClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Per-request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
}

/// HTTP client for the boleto orchestrator.
#[derive(Debug, Clone)]
pub struct BoletoOrchestratorClient {
    /// Base URL including the context path, without a trailing slash.
    base_url: String,
    /// Shared reqwest client.
    http: Client,
}

impl BoletoOrchestratorClient {
    /// Creates a client for the base URL with the given transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base URL is not an
    /// absolute URL, or [`ClientError::Build`] when the transport cannot be built.
    pub fn new(base_url: &str, settings: &ClientSettings) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        if settings.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(|err| ClientError::Build(err.to_string()))?;
        Self::with_http_client(base_url, http)
    }

    /// Creates a client from an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base URL is not absolute.
    pub fn with_http_client(base_url: &str, http: Client) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            http,
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registers a boleto from an arbitrary JSON body.
    ///
    /// Used to send payloads that the typed request cannot express, such as
    /// bodies with required fields removed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or header failures.
    pub async fn register_json(
        &self,
        payload: &Value,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<RegisterBoletoResponse>, ClientError> {
        self.send_json(Method::POST, REGISTER_PATH, payload, headers).await
    }

    /// Cancels a boleto from an arbitrary JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or header failures.
    pub async fn cancel_json(
        &self,
        payload: &Value,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<CancelBoletoResponse>, ClientError> {
        self.send_json(Method::DELETE, CANCEL_PATH, payload, headers).await
    }

    /// Builds the absolute URL for an endpoint path.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }

    /// Sends a JSON body to an endpoint.
    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<T>, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let body = serde_json::to_vec(payload).map_err(|err| ClientError::Encode(err.to_string()))?;
        let request = apply_headers(self.http.request(method, url.clone()), headers)?.body(body);
        execute(request, &url).await
    }
}

#[async_trait]
impl BoletoApi for BoletoOrchestratorClient {
    async fn register(
        &self,
        payload: &RegisterBoletoRequest,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<RegisterBoletoResponse>, ClientError> {
        self.send_json(Method::POST, REGISTER_PATH, payload, headers).await
    }

    async fn query(
        &self,
        params: &QueryBoletoParams,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<QueryBoletoResponse>, ClientError> {
        let mut url = self.endpoint(QUERY_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params.to_pairs() {
                query.append_pair(name, &value);
            }
        }
        let request = apply_headers(self.http.get(url.clone()), headers)?;
        execute(request, &url).await
    }

    async fn cancel(
        &self,
        payload: &CancelBoletoRequest,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<CancelBoletoResponse>, ClientError> {
        self.send_json(Method::DELETE, CANCEL_PATH, payload, headers).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the base URL and strips trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host().is_none() {
        return Err(ClientError::InvalidBaseUrl(format!("{trimmed} is not an absolute http url")));
    }
    Ok(trimmed.to_string())
}

/// Applies headers verbatim to a request builder.
fn apply_headers(
    mut request: RequestBuilder,
    headers: &ApiHeaders,
) -> Result<RequestBuilder, ClientError> {
    for (name, value) in headers.iter() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| ClientError::InvalidHeader {
                name: name.to_string(),
                reason: err.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| ClientError::InvalidHeader {
            name: name.to_string(),
            reason: err.to_string(),
        })?;
        request = request.header(header_name, header_value);
    }
    Ok(request)
}

/// Sends a request and normalizes the response.
async fn execute<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &Url,
) -> Result<HttpResult<T>, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    Ok(HttpResult::from_parts(status, &bytes, url.as_str()))
}

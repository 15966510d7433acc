// crates/boleto-harness/tests/common/mod.rs
// ============================================================================
// Module: Fake Orchestrator
// Description: In-process BoletoApi with scripted eventual consistency.
// Purpose: Exercise polling and batch orchestration without a network.
// Dependencies: async-trait, boleto-client, serde_json, tokio
// ============================================================================

//! ## Overview
//! [`FakeBoletoApi`] numbers registrations by call order. Queries for a
//! known boleto answer 404 for the first `pending_queries` attempts and
//! 200 afterwards; selected registrations never become visible. A second
//! cancel of the same boleto answers 422 with a duplicate message.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use boleto_client::ApiHeaders;
use boleto_client::BoletoApi;
use boleto_client::CancelBoletoRequest;
use boleto_client::CancelBoletoResponse;
use boleto_client::ClientError;
use boleto_client::HttpResult;
use boleto_client::QueryBoletoParams;
use boleto_client::QueryBoletoResponse;
use boleto_client::RegisterBoletoRequest;
use boleto_client::RegisterBoletoResponse;
use boleto_client::StatusCode;
use serde_json::Value;
use serde_json::json;
use tokio::time::Instant;

const BASE: &str = "http://fake/ctx";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Scripted behaviour of the fake.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeConfig {
    /// 404 answers before a boleto becomes visible.
    pub pending_queries: u32,
    /// Every n-th registration call answers 503.
    pub reject_register_every: Option<usize>,
    /// Every n-th registration call fails at the transport layer.
    pub fail_register_every: Option<usize>,
    /// Every n-th registration call is accepted but never becomes visible.
    pub never_visible_every: Option<usize>,
    /// Number of initial query calls that fail at the transport layer.
    pub transport_failures: usize,
}

// ============================================================================
// SECTION: Fake
// ============================================================================

#[derive(Debug)]
struct StoredBoleto {
    amount: f64,
    due_date: String,
    visible: bool,
    queries: u32,
    cancelled: bool,
    first_query_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct FakeState {
    register_calls: usize,
    query_calls: usize,
    cancel_calls: usize,
    boletos: HashMap<String, StoredBoleto>,
}

/// In-process orchestrator double.
#[derive(Debug, Default)]
pub struct FakeBoletoApi {
    config: FakeConfig,
    state: Mutex<FakeState>,
}

impl FakeBoletoApi {
    pub fn new(config: FakeConfig) -> Self {
        Self {
            config,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn register_calls(&self) -> usize {
        self.state.lock().unwrap().register_calls
    }

    pub fn query_calls(&self) -> usize {
        self.state.lock().unwrap().query_calls
    }

    pub fn cancel_calls(&self) -> usize {
        self.state.lock().unwrap().cancel_calls
    }

    /// Instant of the first query for each boleto number.
    pub fn first_query_times(&self) -> HashMap<String, Instant> {
        self.state
            .lock()
            .unwrap()
            .boletos
            .iter()
            .filter_map(|(numero, stored)| stored.first_query_at.map(|at| (numero.clone(), at)))
            .collect()
    }
}

fn respond<T: serde::de::DeserializeOwned>(status: StatusCode, body: &Value, path: &str) -> HttpResult<T> {
    let bytes = serde_json::to_vec(body).unwrap();
    HttpResult::from_parts(status, &bytes, format!("{BASE}{path}"))
}

#[async_trait]
impl BoletoApi for FakeBoletoApi {
    async fn register(
        &self,
        payload: &RegisterBoletoRequest,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<RegisterBoletoResponse>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.register_calls += 1;
        let call = state.register_calls;
        let correlation_id = headers.correlation_id().unwrap_or_default();

        if self.config.fail_register_every.is_some_and(|every| call % every == 0) {
            return Err(ClientError::InvalidUrl("simulated connection refused".to_string()));
        }
        if self.config.reject_register_every.is_some_and(|every| call % every == 0) {
            return Ok(respond(
                StatusCode::SERVICE_UNAVAILABLE,
                &json!({"mensagem": "servico indisponivel", "correlationId": correlation_id}),
                "/api/boletos",
            ));
        }

        let numero = format!("BOL{call:06}");
        state.boletos.insert(
            numero.clone(),
            StoredBoleto {
                amount: payload.terms.amount.to_string().parse().unwrap(),
                due_date: payload.terms.due_date.to_string(),
                visible: !self.config.never_visible_every.is_some_and(|every| call % every == 0),
                queries: 0,
                cancelled: false,
                first_query_at: None,
            },
        );
        Ok(respond(
            StatusCode::ACCEPTED,
            &json!({
                "codigo": "202",
                "mensagem": "Processo de registro do boleto iniciado com sucesso",
                "correlationId": correlation_id,
                "numeroBoleto": numero,
            }),
            "/api/boletos",
        ))
    }

    async fn query(
        &self,
        params: &QueryBoletoParams,
        _headers: &ApiHeaders,
    ) -> Result<HttpResult<QueryBoletoResponse>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.query_calls += 1;
        if state.query_calls <= self.config.transport_failures {
            return Err(ClientError::InvalidUrl("simulated connection reset".to_string()));
        }
        let path = format!("/api/boleto?numeroBoleto={}", params.numero_boleto);
        let pending = self.config.pending_queries;
        let Some(stored) = state.boletos.get_mut(&params.numero_boleto) else {
            return Ok(respond(StatusCode::NOT_FOUND, &json!({"mensagem": "nao encontrado"}), &path));
        };
        stored.first_query_at.get_or_insert_with(Instant::now);
        stored.queries += 1;
        if !stored.visible || stored.queries <= pending {
            return Ok(respond(StatusCode::NOT_FOUND, &json!({"mensagem": "nao encontrado"}), &path));
        }

        let status = if stored.cancelled { "CANCELADO" } else { "REGISTRADO" };
        let events = if params.buscar_eventos == Some(true) {
            json!([{"status": "RECEBIDO", "dataCriacao": "2026-10-19T10:00:00"}, {"status": status, "dataCriacao": "2026-10-19T10:00:01"}])
        } else {
            json!([])
        };
        Ok(respond(
            StatusCode::OK,
            &json!({
                "boleto": {
                    "status": status,
                    "nossoNumero": params.numero_boleto,
                    "urlPdf": "https://fake/pdf",
                    "valor": stored.amount,
                    "dataVencimento": stored.due_date,
                    "linhaDigitavel": "34191.79001 01043.510047"
                },
                "boletoEventos": events,
            }),
            &path,
        ))
    }

    async fn cancel(
        &self,
        payload: &CancelBoletoRequest,
        headers: &ApiHeaders,
    ) -> Result<HttpResult<CancelBoletoResponse>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.cancel_calls += 1;
        let correlation_id = headers.correlation_id().unwrap_or_default();
        let Some(stored) = state.boletos.get_mut(&payload.numero_boleto) else {
            return Ok(respond(
                StatusCode::NOT_FOUND,
                &json!({"mensagem": "boleto nao encontrado"}),
                "/api/boletos/cancelar",
            ));
        };
        if stored.cancelled {
            return Ok(respond(
                StatusCode::UNPROCESSABLE_ENTITY,
                &json!({"mensagem": "Requisicao duplicada", "correlationId": correlation_id}),
                "/api/boletos/cancelar",
            ));
        }
        stored.cancelled = true;
        Ok(respond(
            StatusCode::ACCEPTED,
            &json!({
                "codigo": "202",
                "mensagem": "Solicitacao de cancelamento recebida com sucesso",
                "correlationId": correlation_id,
            }),
            "/api/boletos/cancelar",
        ))
    }
}

// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Live Fixtures
// Description: Orchestrator client and prerequisite flows for live suites.
// Purpose: Build the client from env config and register fresh boletos.
// Dependencies: system-tests, boleto-client, boleto-harness, tokio
// ============================================================================

//! ## Overview
//! Every live test builds a [`LiveContext`] from the environment. Suites that
//! query or cancel need a freshly registered boleto first; [`LiveContext::register_fresh`]
//! performs that step and fails the test when registration is not accepted.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use boleto_client::ApiHeaders;
use boleto_client::BoletoApi;
use boleto_client::BoletoOrchestratorClient;
use boleto_client::HttpResult;
use boleto_client::ProcessingMode;
use boleto_client::QueryBoletoParams;
use boleto_client::QueryBoletoResponse;
use boleto_client::RegisterBoletoRequest;
use boleto_harness::PollOutcome;
use boleto_harness::QueryAttempt;
use boleto_harness::TestDataBuilder;
use boleto_harness::ensure_success;
use boleto_harness::new_correlation_id;
use boleto_harness::poll_query;
use boleto_harness::telemetry::init_tracing;
use system_tests::config::SystemTestConfig;

use super::artifacts::TestReporter;

/// Pause after registration before a dependent query.
pub const QUERY_PREREQUISITE_PAUSE: Duration = Duration::from_millis(800);
/// Pause between two calls that must not race each other.
pub const SEQUENCE_PAUSE: Duration = Duration::from_millis(200);

/// Shared state for a live test.
pub struct LiveContext {
    /// Environment configuration.
    pub config: SystemTestConfig,
    /// Orchestrator client.
    pub client: Arc<BoletoOrchestratorClient>,
    /// Payload builder anchored at today's date.
    pub builder: TestDataBuilder,
}

/// A boleto accepted by the orchestrator during test setup.
#[derive(Debug, Clone)]
pub struct RegisteredFixture {
    /// Identifier returned by the orchestrator.
    pub numero_boleto: String,
    /// Correlation id used for the registration.
    pub correlation_id: String,
    /// Payload that was registered.
    pub payload: RegisterBoletoRequest,
}

impl LiveContext {
    /// Loads configuration and builds the client.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        init_tracing();
        let config = SystemTestConfig::load()?;
        let client = BoletoOrchestratorClient::new(&config.base_url, &config.client_settings())?;
        tracing::info!(base_url = client.base_url(), "live orchestrator configured");
        Ok(Self {
            config,
            client: Arc::new(client),
            builder: TestDataBuilder::new(),
        })
    }

    /// Registers a unique boleto and returns its number.
    pub async fn register_fresh(
        &self,
        reporter: &mut TestReporter,
    ) -> Result<RegisteredFixture, Box<dyn Error>> {
        let correlation_id = new_correlation_id();
        let payload = self.builder.unique_register_payload();
        let headers = ApiHeaders::register(&correlation_id, ProcessingMode::Online);
        let result = self.client.register(&payload, &headers).await?;
        reporter.record("prerequisite register", &result);
        ensure_success(&result, "prerequisite registration")?;
        let numero_boleto = result
            .success()
            .map(|body| body.numero_boleto.clone())
            .filter(|numero| !numero.is_empty())
            .ok_or("prerequisite registration returned no numeroBoleto")?;
        Ok(RegisteredFixture {
            numero_boleto,
            correlation_id,
            payload,
        })
    }

    /// Polls the query endpoint until the boleto is visible or retries run out.
    pub async fn query_until_visible(
        &self,
        numero_boleto: &str,
        buscar_eventos: bool,
        correlation_id: &str,
    ) -> PollOutcome<QueryAttempt> {
        let params = QueryBoletoParams::new(numero_boleto, buscar_eventos);
        let headers = ApiHeaders::query(correlation_id);
        poll_query(self.client.as_ref(), &params, &headers, &self.config.retry).await
    }
}

/// Unwraps the final poll attempt, failing on transport errors.
pub fn last_query(
    outcome: PollOutcome<QueryAttempt>,
) -> Result<HttpResult<QueryBoletoResponse>, Box<dyn Error>> {
    let attempts = outcome.attempts;
    outcome
        .into_last()
        .map_err(|err| format!("query failed after {attempts} attempts: {err}").into())
}

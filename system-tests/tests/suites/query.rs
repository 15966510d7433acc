// system-tests/tests/suites/query.rs
// ============================================================================
// Module: Query Contract Tests
// Description: Live checks for GET /api/boleto.
// Purpose: Verify visibility after registration and query-parameter rejects.
// Dependencies: system-tests helpers, boleto-client, boleto-harness
// ============================================================================

//! ## Overview
//! Registration is asynchronous, so successful queries poll until the boleto
//! becomes visible before asserting on the record.

use std::error::Error;

use boleto_client::ApiHeaders;
use boleto_client::BoletoApi;
use boleto_client::QueryBoletoParams;
use boleto_harness::ensure_status;
use boleto_harness::ensure_success;
use boleto_harness::new_correlation_id;
use boleto_harness::validate_boleto_record;
use helpers::artifacts::TestReporter;
use helpers::checks::require;
use helpers::fixtures::LiveContext;
use helpers::fixtures::QUERY_PREREQUISITE_PAUSE;
use helpers::fixtures::last_query;

use crate::helpers;

const UNKNOWN_BOLETO: &str = "BOLETO_INEXISTENTE_12345";

async fn query_registered(test_name: &str, buscar_eventos: bool) -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new(test_name)?;
    let ctx = LiveContext::from_env()?;
    let fixture = ctx.register_fresh(&mut reporter).await?;
    tokio::time::sleep(QUERY_PREREQUISITE_PAUSE).await;

    let outcome =
        ctx.query_until_visible(&fixture.numero_boleto, buscar_eventos, &fixture.correlation_id).await;
    let attempts = outcome.attempts;
    let result = last_query(outcome)?;
    reporter.record("query registered", &result);

    ensure_success(&result, "query registered boleto")?;
    ensure_status(&result, 200, "query registered boleto")?;
    let body = result.success().ok_or("query body did not match the boleto shape")?;
    validate_boleto_record(&body.boleto)?;
    if buscar_eventos {
        require(!body.boleto_eventos.is_empty(), "events were requested but none returned")?;
    }

    reporter.pass(&format!(
        "boleto visible after {attempts} attempts with {} events",
        body.boleto_eventos.len()
    ))?;
    drop(reporter);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn query_with_events_returns_record() -> Result<(), Box<dyn Error>> {
    query_registered("query_with_events_returns_record", true).await
}

#[tokio::test(flavor = "multi_thread")]
async fn query_without_events_returns_record() -> Result<(), Box<dyn Error>> {
    query_registered("query_without_events_returns_record", false).await
}

async fn query_rejected(
    test_name: &str,
    params: QueryBoletoParams,
    expected: u16,
) -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new(test_name)?;
    let ctx = LiveContext::from_env()?;

    let result = ctx.client.query(&params, &ApiHeaders::query(&new_correlation_id())).await?;
    reporter.record("query", &result);
    ensure_status(&result, expected, test_name)?;

    reporter.pass(&format!("query answered {expected}"))?;
    drop(reporter);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn query_rejects_empty_numero_boleto() -> Result<(), Box<dyn Error>> {
    query_rejected("query_rejects_empty_numero_boleto", QueryBoletoParams::new("", true), 400)
        .await
}

#[tokio::test(flavor = "multi_thread")]
async fn query_rejects_missing_events_flag() -> Result<(), Box<dyn Error>> {
    let params = QueryBoletoParams {
        numero_boleto: "abc123".to_string(),
        buscar_eventos: None,
    };
    query_rejected("query_rejects_missing_events_flag", params, 400).await
}

#[tokio::test(flavor = "multi_thread")]
async fn query_unknown_boleto_is_not_found() -> Result<(), Box<dyn Error>> {
    query_rejected(
        "query_unknown_boleto_is_not_found",
        QueryBoletoParams::new(UNKNOWN_BOLETO, true),
        404,
    )
    .await
}

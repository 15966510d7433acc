// system-tests/tests/suites/load.rs
// ============================================================================
// Module: Load Tests
// Description: Concurrent registration and staggered verification.
// Purpose: Gate the orchestrator on the verified / registered ratio.
// Dependencies: system-tests helpers, boleto-harness, tokio
// ============================================================================

//! ## Overview
//! Registers `BOLETO_SYSTEM_TEST_LOAD_SIZE` boletos at once, waits for the
//! asynchronous pipeline to settle, then polls every accepted boleto. The
//! run writes its summary and per-item outcomes before applying the gate.

use std::error::Error;
use std::sync::Arc;

use boleto_harness::run_load_scenario;
use helpers::artifacts::EXCHANGES_FILE;
use helpers::artifacts::TestReporter;
use helpers::checks::require;
use helpers::fixtures::LiveContext;

use crate::helpers;

/// Verified records whose structure is checked individually.
const STRUCTURE_SAMPLE: usize = 10;

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_registrations_become_visible() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("concurrent_registrations_become_visible")?;
    let ctx = LiveContext::from_env()?;
    let profile = ctx.config.load;

    let report = run_load_scenario(Arc::clone(&ctx.client), ctx.builder, &profile).await?;
    let summary = report.summary();
    reporter.artifacts().write_json("load_summary.json", &summary)?;
    reporter.artifacts().write_json("registrations.json", &report.registered)?;
    reporter.artifacts().write_json("registration_failures.json", &report.registration_failures)?;
    reporter.artifacts().write_json("verifications.json", &report.verifications)?;

    for outcome in report.verifications.iter().filter(|outcome| outcome.verified).take(STRUCTURE_SAMPLE)
    {
        require(
            outcome.structure_error.is_none(),
            format!(
                "boleto {} returned an incomplete record: {}",
                outcome.numero_boleto,
                outcome.structure_error.as_deref().unwrap_or_default()
            ),
        )?;
    }
    report.evaluate(profile.min_success_ratio)?;

    reporter.finish(
        "pass",
        vec![format!(
            "{}/{} registered boletos verified (ratio {:.2}, threshold {:.2})",
            summary.verified, summary.registered, summary.success_ratio, summary.min_success_ratio
        )],
        vec![
            "summary.json".to_string(),
            "summary.md".to_string(),
            EXCHANGES_FILE.to_string(),
            "load_summary.json".to_string(),
            "registrations.json".to_string(),
            "registration_failures.json".to_string(),
            "verifications.json".to_string(),
        ],
    )?;
    drop(reporter);
    Ok(())
}

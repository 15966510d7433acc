// crates/boleto-harness/src/batch.rs
// ============================================================================
// Module: Concurrent Load Orchestration
// Description: Fan-out registration, settle, then staggered fan-out verification.
// Purpose: Measure how many concurrently registered boletos become queryable.
// Dependencies: boleto-client, rust_decimal, serde, tokio, tracing
// ============================================================================

//! ## Overview
//! A load scenario runs three phases:
//! 1. register `batch_size` unique payloads concurrently,
//! 2. pause for `settle_delay`,
//! 3. query every registered boleto concurrently, the i-th starting after
//!    `stagger * i`, each polled with the profile's [`RetryPolicy`].
//!
//! Invariants:
//! - A failed branch (non-2xx, transport error, or panicked task) is recorded
//!   and excluded; it never aborts the batch.
//! - Results are collected only after every branch of a phase has settled,
//!   then sorted by launch index.
//! - The success ratio is verified / registered and must strictly exceed
//!   the threshold.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use boleto_client::ApiHeaders;
use boleto_client::BoletoApi;
use boleto_client::BoletoRecord;
use boleto_client::ProcessingMode;
use boleto_client::QueryBoletoParams;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::info;
use tracing::warn;

use crate::assertions::validate_boleto_record;
use crate::builder::TestDataBuilder;
use crate::correlation::new_correlation_id;
use crate::error::ConfigError;
use crate::polling::RetryPolicy;
use crate::polling::poll_query;

// ============================================================================
// SECTION: Profile
// ============================================================================

/// Default number of concurrent registrations.
pub const DEFAULT_BATCH_SIZE: usize = 50;
/// Default pause between the registration and verification phases.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(5000);
/// Default per-index verification start offset.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(50);
/// Default minimum verified / registered ratio.
pub const DEFAULT_MIN_SUCCESS_RATIO: f64 = 0.8;

/// Load scenario settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadProfile {
    /// Number of registrations launched at once.
    pub batch_size: usize,
    /// Processing mode sent on every registration.
    pub processing_mode: ProcessingMode,
    /// Pause before verification starts.
    pub settle_delay: Duration,
    /// Start offset added per verification index.
    pub stagger: Duration,
    /// Per-item query polling.
    pub retry: RetryPolicy,
    /// Ratio the verified share must exceed.
    pub min_success_ratio: f64,
    /// Request event history on verification queries.
    pub include_events: bool,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            processing_mode: ProcessingMode::Online,
            settle_delay: DEFAULT_SETTLE_DELAY,
            stagger: DEFAULT_STAGGER,
            retry: RetryPolicy::default(),
            min_success_ratio: DEFAULT_MIN_SUCCESS_RATIO,
            include_events: true,
        }
    }
}

impl LoadProfile {
    /// Validates the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero batch size, a zero-attempt retry
    /// policy, or a ratio outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        self.retry.validate()?;
        if !(0.0 ..= 1.0).contains(&self.min_success_ratio) {
            return Err(ConfigError::RatioOutOfRange(self.min_success_ratio));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Item Results
// ============================================================================

/// Registration accepted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredBoleto {
    /// Launch index within the batch.
    pub index: usize,
    /// Boleto number returned by the orchestrator.
    pub numero_boleto: String,
    /// Correlation id used to register and later query.
    pub correlation_id: String,
    /// External id sent with the payload.
    pub external_id: String,
    /// Amount sent with the payload.
    pub amount: Decimal,
    /// Registration status.
    pub status: u16,
}

/// Registration that did not yield a boleto number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationFailure {
    /// Launch index within the batch.
    pub index: usize,
    /// Correlation id used, when the branch got far enough to pick one.
    pub correlation_id: Option<String>,
    /// Received status, absent for transport failures.
    pub status: Option<u16>,
    /// Failure description.
    pub reason: String,
}

/// Verification result for one registered boleto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    /// Launch index of the verification (position among registered items).
    pub index: usize,
    /// Boleto number queried.
    pub numero_boleto: String,
    /// Query attempts performed.
    pub attempts: u32,
    /// Final status, absent for transport failures.
    pub status: Option<u16>,
    /// True when the final query returned 2xx.
    pub verified: bool,
    /// Returned record, when verified.
    pub record: Option<BoletoRecord>,
    /// Number of events returned.
    pub event_count: usize,
    /// Record structure problem, when verified but incomplete.
    pub structure_error: Option<String>,
    /// Failure description, when not verified.
    pub error: Option<String>,
}

/// Output of the registration phase.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationPhase {
    /// Accepted registrations sorted by index.
    pub registered: Vec<RegisteredBoleto>,
    /// Failed registrations sorted by index.
    pub failures: Vec<RegistrationFailure>,
    /// Wall-clock duration of the phase.
    pub elapsed: Duration,
}

/// Output of the verification phase.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationPhase {
    /// Outcomes sorted by index.
    pub outcomes: Vec<VerificationOutcome>,
    /// Wall-clock duration of the phase.
    pub elapsed: Duration,
}

// ============================================================================
// SECTION: Registration Phase
// ============================================================================

/// Launches `profile.batch_size` unique registrations concurrently.
pub async fn register_batch<A>(
    api: Arc<A>,
    builder: TestDataBuilder,
    profile: &LoadProfile,
) -> RegistrationPhase
where
    A: BoletoApi + 'static,
{
    let started = Instant::now();
    let mode = profile.processing_mode;
    let mut tasks = JoinSet::new();
    let mut indices = HashMap::new();
    for index in 0 .. profile.batch_size {
        let api = Arc::clone(&api);
        let handle =
            tasks.spawn(async move { register_one(api.as_ref(), builder, mode, index).await });
        indices.insert(handle.id(), index);
    }

    let mut registered = Vec::new();
    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, Ok(item))) => registered.push(item),
            Ok((_, Err(failure))) => failures.push(failure),
            Err(err) => failures.push(RegistrationFailure {
                index: indices.get(&err.id()).copied().unwrap_or_default(),
                correlation_id: None,
                status: None,
                reason: format!("registration task failed: {err}"),
            }),
        }
    }
    registered.sort_by_key(|item| item.index);
    failures.sort_by_key(|item| item.index);
    let elapsed = started.elapsed();

    info!(
        requested = profile.batch_size,
        registered = registered.len(),
        failed = failures.len(),
        elapsed_ms = millis(elapsed),
        per_second = throughput(profile.batch_size, elapsed),
        "registration phase complete"
    );
    RegistrationPhase {
        registered,
        failures,
        elapsed,
    }
}

/// Registers one generated payload and classifies the outcome.
async fn register_one<A>(
    api: &A,
    builder: TestDataBuilder,
    mode: ProcessingMode,
    index: usize,
) -> Result<RegisteredBoleto, RegistrationFailure>
where
    A: BoletoApi + ?Sized,
{
    let correlation_id = new_correlation_id();
    let payload = builder.unique_register_payload();
    let headers = ApiHeaders::register(&correlation_id, mode);
    let failure = |status: Option<u16>, reason: String| {
        warn!(index, status, reason = %reason, "registration failed");
        RegistrationFailure {
            index,
            correlation_id: Some(correlation_id.clone()),
            status,
            reason,
        }
    };

    match api.register(&payload, &headers).await {
        Ok(result) => {
            let status = result.status_code();
            let numero = result
                .success()
                .map(|body| body.numero_boleto.clone())
                .filter(|numero| !numero.is_empty());
            match numero {
                Some(numero_boleto) if result.ok => Ok(RegisteredBoleto {
                    index,
                    numero_boleto,
                    correlation_id: correlation_id.clone(),
                    external_id: payload.external_id,
                    amount: payload.terms.amount,
                    status,
                }),
                _ if result.ok => {
                    Err(failure(Some(status), "accepted without a boleto number".to_string()))
                }
                _ => Err(failure(
                    Some(status),
                    result.message().unwrap_or("non-success status").to_string(),
                )),
            }
        }
        Err(err) => Err(failure(None, err.to_string())),
    }
}

// ============================================================================
// SECTION: Verification Phase
// ============================================================================

/// Queries every registered boleto with staggered starts and polling.
pub async fn verify_batch<A>(
    api: Arc<A>,
    registered: &[RegisteredBoleto],
    profile: &LoadProfile,
) -> VerificationPhase
where
    A: BoletoApi + 'static,
{
    let started = Instant::now();
    let mut tasks = JoinSet::new();
    let mut launched = HashMap::new();
    for (index, item) in registered.iter().enumerate() {
        let api = Arc::clone(&api);
        let item = item.clone();
        let offset = profile.stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
        let retry = profile.retry;
        let include_events = profile.include_events;
        let numero = item.numero_boleto.clone();
        let handle = tasks.spawn(async move {
            tokio::time::sleep(offset).await;
            verify_one(api.as_ref(), index, &item, &retry, include_events).await
        });
        launched.insert(handle.id(), (index, numero));
    }

    let mut outcomes = Vec::with_capacity(registered.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, outcome)) => outcomes.push(outcome),
            Err(err) => {
                let (index, numero_boleto) = launched.remove(&err.id()).unwrap_or_default();
                warn!(index, numero_boleto = %numero_boleto, "verification task failed");
                outcomes.push(VerificationOutcome {
                    index,
                    numero_boleto,
                    attempts: 0,
                    status: None,
                    verified: false,
                    record: None,
                    event_count: 0,
                    structure_error: None,
                    error: Some(format!("verification task failed: {err}")),
                });
            }
        }
    }
    outcomes.sort_by_key(|outcome| outcome.index);
    let elapsed = started.elapsed();

    info!(
        queried = outcomes.len(),
        verified = outcomes.iter().filter(|outcome| outcome.verified).count(),
        elapsed_ms = millis(elapsed),
        per_second = throughput(outcomes.len(), elapsed),
        "verification phase complete"
    );
    VerificationPhase {
        outcomes,
        elapsed,
    }
}

/// Polls one registered boleto and validates the visible record.
async fn verify_one<A>(
    api: &A,
    index: usize,
    item: &RegisteredBoleto,
    retry: &RetryPolicy,
    include_events: bool,
) -> VerificationOutcome
where
    A: BoletoApi + ?Sized,
{
    let params = QueryBoletoParams::new(item.numero_boleto.clone(), include_events);
    let headers = ApiHeaders::query(&item.correlation_id);
    let outcome = poll_query(api, &params, &headers, retry).await;
    let attempts = outcome.attempts;

    let mut verification = VerificationOutcome {
        index,
        numero_boleto: item.numero_boleto.clone(),
        attempts,
        status: None,
        verified: false,
        record: None,
        event_count: 0,
        structure_error: None,
        error: None,
    };
    match outcome.into_last() {
        Ok(result) => {
            verification.status = Some(result.status_code());
            verification.verified = result.ok;
            if let Some(body) = result.success() {
                verification.structure_error =
                    validate_boleto_record(&body.boleto).err().map(|err| err.to_string());
                verification.event_count = body.boleto_eventos.len();
                verification.record = Some(body.boleto.clone());
            }
            if !result.ok {
                verification.error = Some(format!("query returned status {}", result.status_code()));
            }
        }
        Err(err) => verification.error = Some(err.to_string()),
    }
    if !verification.verified {
        warn!(
            numero_boleto = %item.numero_boleto,
            attempts,
            status = verification.status,
            "boleto not verified"
        );
    }
    verification
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// Runs registration, settle delay, and verification.
///
/// The settle delay and verification phase are skipped when nothing was
/// registered.
///
/// # Errors
///
/// Returns [`ConfigError`] when the profile is invalid. Item failures are
/// data in the returned report.
pub async fn run_load_scenario<A>(
    api: Arc<A>,
    builder: TestDataBuilder,
    profile: &LoadProfile,
) -> Result<LoadReport, ConfigError>
where
    A: BoletoApi + 'static,
{
    profile.validate()?;
    let registration = register_batch(Arc::clone(&api), builder, profile).await;
    let verification = if registration.registered.is_empty() {
        VerificationPhase {
            outcomes: Vec::new(),
            elapsed: Duration::ZERO,
        }
    } else {
        info!(settle_ms = millis(profile.settle_delay), "waiting for backend processing");
        tokio::time::sleep(profile.settle_delay).await;
        verify_batch(api, &registration.registered, profile).await
    };

    let report = LoadReport {
        profile: *profile,
        registered: registration.registered,
        registration_failures: registration.failures,
        verifications: verification.outcomes,
        registration_elapsed: registration.elapsed,
        verification_elapsed: verification.elapsed,
    };
    let summary = report.summary();
    info!(
        registered = summary.registered,
        requested = summary.requested,
        verified = summary.verified,
        success_ratio = summary.success_ratio,
        passed = summary.passed,
        "load scenario complete"
    );
    Ok(report)
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Load gate failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadScenarioError {
    /// No registration succeeded.
    #[error("no registration succeeded out of {requested}")]
    NoRegistrations {
        /// Registrations attempted.
        requested: usize,
    },
    /// Verified share did not exceed the threshold.
    #[error(
        "verified {verified}/{registered} boletos (ratio {ratio:.4}), expected ratio above \
         {threshold}"
    )]
    BelowThreshold {
        /// Boletos verified.
        verified: usize,
        /// Boletos registered.
        registered: usize,
        /// Observed ratio.
        ratio: f64,
        /// Required ratio.
        threshold: f64,
    },
}

/// Full load scenario result.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// Profile the scenario ran with.
    pub profile: LoadProfile,
    /// Accepted registrations.
    pub registered: Vec<RegisteredBoleto>,
    /// Failed registrations.
    pub registration_failures: Vec<RegistrationFailure>,
    /// Per-item verification outcomes.
    pub verifications: Vec<VerificationOutcome>,
    /// Registration phase duration.
    pub registration_elapsed: Duration,
    /// Verification phase duration.
    pub verification_elapsed: Duration,
}

impl LoadReport {
    /// Number of verified boletos.
    #[must_use]
    pub fn verified_count(&self) -> usize {
        self.verifications.iter().filter(|outcome| outcome.verified).count()
    }

    /// Verified / registered, or zero when nothing was registered.
    #[must_use]
    pub fn success_ratio(&self) -> f64 {
        ratio(self.verified_count(), self.registered.len())
    }

    /// Verified outcomes whose record failed structure validation.
    pub fn structure_failures(&self) -> impl Iterator<Item = &VerificationOutcome> {
        self.verifications
            .iter()
            .filter(|outcome| outcome.verified && outcome.structure_error.is_some())
    }

    /// Applies the load gate.
    ///
    /// # Errors
    ///
    /// Returns [`LoadScenarioError`] when nothing registered or the ratio
    /// does not strictly exceed `min_success_ratio`.
    pub fn evaluate(&self, min_success_ratio: f64) -> Result<(), LoadScenarioError> {
        if self.registered.is_empty() {
            return Err(LoadScenarioError::NoRegistrations {
                requested: self.profile.batch_size,
            });
        }
        let ratio = self.success_ratio();
        if ratio > min_success_ratio {
            return Ok(());
        }
        Err(LoadScenarioError::BelowThreshold {
            verified: self.verified_count(),
            registered: self.registered.len(),
            ratio,
            threshold: min_success_ratio,
        })
    }

    /// Serializable summary for artifacts.
    #[must_use]
    pub fn summary(&self) -> LoadSummary {
        let verified = self.verified_count();
        LoadSummary {
            processing_mode: self.profile.processing_mode,
            requested: self.profile.batch_size,
            registered: self.registered.len(),
            registration_failures: self.registration_failures.len(),
            verified,
            verification_failures: self.verifications.len() - verified,
            structure_failures: self.structure_failures().count(),
            success_ratio: self.success_ratio(),
            min_success_ratio: self.profile.min_success_ratio,
            passed: self.evaluate(self.profile.min_success_ratio).is_ok(),
            registration_elapsed_ms: millis(self.registration_elapsed),
            verification_elapsed_ms: millis(self.verification_elapsed),
            registrations_per_second: throughput(self.profile.batch_size, self.registration_elapsed),
            queries_per_second: throughput(self.registered.len(), self.verification_elapsed),
        }
    }
}

/// Serializable load scenario summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    /// Processing mode used for registrations.
    pub processing_mode: ProcessingMode,
    /// Registrations attempted.
    pub requested: usize,
    /// Registrations accepted.
    pub registered: usize,
    /// Registrations failed.
    pub registration_failures: usize,
    /// Boletos verified.
    pub verified: usize,
    /// Boletos not verified.
    pub verification_failures: usize,
    /// Verified boletos with incomplete records.
    pub structure_failures: usize,
    /// Verified / registered.
    pub success_ratio: f64,
    /// Threshold from the profile.
    pub min_success_ratio: f64,
    /// Whether the gate passed with the profile threshold.
    pub passed: bool,
    /// Registration phase duration in milliseconds.
    pub registration_elapsed_ms: u64,
    /// Verification phase duration in milliseconds.
    pub verification_elapsed_ms: u64,
    /// Requested registrations per second.
    pub registrations_per_second: f64,
    /// Registered boletos queried per second.
    pub queries_per_second: f64,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Duration in whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Ratio of two counts; zero when the denominator is zero.
#[allow(clippy::cast_precision_loss, reason = "Counts stay far below 2^52.")]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Items per second over `elapsed`.
#[allow(clippy::cast_precision_loss, reason = "Counts stay far below 2^52.")]
fn throughput(count: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return 0.0;
    }
    count as f64 / seconds
}

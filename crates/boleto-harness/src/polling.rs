// crates/boleto-harness/src/polling.rs
// ============================================================================
// Module: Bounded Polling
// Description: Retry an operation with a fixed delay until it succeeds.
// Purpose: Absorb the delay between an accepted registration and visibility.
// Dependencies: boleto-client, tokio, tracing
// ============================================================================

//! ## Overview
//! Registration is accepted before the boleto can be queried. Polling runs
//! a two-state machine: RETRYING until the predicate holds or the attempt
//! ceiling is reached, then DONE. Exhaustion is not an error; the last
//! observed value is handed back so callers can assert on it.
//! Invariants:
//! - At least one attempt is made.
//! - No delay follows the final attempt.

use std::future::Future;
use std::time::Duration;

use boleto_client::ApiHeaders;
use boleto_client::BoletoApi;
use boleto_client::ClientError;
use boleto_client::HttpResult;
use boleto_client::QueryBoletoParams;
use boleto_client::QueryBoletoResponse;
use tracing::debug;
use tracing::warn;

use crate::error::ConfigError;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Default attempt ceiling.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;
/// Default delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Attempt ceiling and fixed inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Rejects policies that allow no attempts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroAttempts`] when `max_attempts` is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Terminal state of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// The predicate held on the last attempt.
    Satisfied,
    /// The attempt ceiling was reached without the predicate holding.
    Exhausted,
}

/// Result of a poll: terminal state, attempts used, and the last value seen.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome<T> {
    /// Terminal state.
    pub status: PollStatus,
    /// Attempts performed.
    pub attempts: u32,
    /// Value produced by the final attempt.
    pub last: T,
}

impl<T> PollOutcome<T> {
    /// Returns true when the poll ended satisfied.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.status == PollStatus::Satisfied
    }

    /// Returns the last observed value.
    #[must_use]
    pub fn into_last(self) -> T {
        self.last
    }
}

// ============================================================================
// SECTION: Polling
// ============================================================================

/// Runs `operation` until `is_done` accepts its output or attempts run out.
///
/// `operation` receives the 1-based attempt number. A policy with zero
/// attempts still performs one attempt.
pub async fn poll_until<T, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    mut is_done: P,
) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = T>,
    P: FnMut(&T) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let last = operation(attempt).await;
        if is_done(&last) {
            return PollOutcome {
                status: PollStatus::Satisfied,
                attempts: attempt,
                last,
            };
        }
        if attempt >= max_attempts {
            warn!(attempts = attempt, "polling exhausted without success");
            return PollOutcome {
                status: PollStatus::Exhausted,
                attempts: attempt,
                last,
            };
        }
        debug!(
            attempt,
            max_attempts,
            delay_ms = policy.delay.as_millis(),
            "poll attempt unsatisfied; retrying"
        );
        tokio::time::sleep(policy.delay).await;
        attempt += 1;
    }
}

/// Query result as seen by the poller; transport failures are retried.
pub type QueryAttempt = Result<HttpResult<QueryBoletoResponse>, ClientError>;

/// Polls the query endpoint until it answers with a 2xx status.
pub async fn poll_query<A>(
    api: &A,
    params: &QueryBoletoParams,
    headers: &ApiHeaders,
    policy: &RetryPolicy,
) -> PollOutcome<QueryAttempt>
where
    A: BoletoApi + ?Sized,
{
    poll_until(
        policy,
        |_| api.query(params, headers),
        |attempt: &QueryAttempt| matches!(attempt, Ok(result) if result.ok),
    )
    .await
}

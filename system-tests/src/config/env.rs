// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for live boleto suites.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: boleto-client, boleto-harness
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Every orchestration constant
//! has a default and can be overridden for slower or faster environments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use boleto_client::ClientSettings;
use boleto_harness::LoadProfile;
use boleto_harness::RetryPolicy;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Base URL used when `BASE_URL` is unset. Includes the context path.
pub const DEFAULT_BASE_URL: &str =
    "https://apps.meiosdepagamentobap.dev.awsporto/sboot-fina-mpdp-boleto-orchestrator";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Orchestrator base URL including the context path.
    BaseUrl,
    /// Optional run root override.
    RunRoot,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Accept invalid TLS certificates (`true`/`false` or `1`/`0`).
    AcceptInvalidCerts,
    /// Query polling attempt ceiling.
    PollAttempts,
    /// Delay between polling attempts in milliseconds.
    PollDelayMs,
    /// Concurrent registrations in the load suite.
    LoadSize,
    /// Pause between load phases in milliseconds.
    SettleDelayMs,
    /// Per-index verification stagger in milliseconds.
    StaggerMs,
    /// Verified / registered ratio the load suite must exceed.
    MinSuccessRatio,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "BASE_URL",
            Self::RunRoot => "BOLETO_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutSeconds => "BOLETO_SYSTEM_TEST_TIMEOUT_SEC",
            Self::AcceptInvalidCerts => "BOLETO_SYSTEM_TEST_ACCEPT_INVALID_CERTS",
            Self::PollAttempts => "BOLETO_SYSTEM_TEST_POLL_ATTEMPTS",
            Self::PollDelayMs => "BOLETO_SYSTEM_TEST_POLL_DELAY_MS",
            Self::LoadSize => "BOLETO_SYSTEM_TEST_LOAD_SIZE",
            Self::SettleDelayMs => "BOLETO_SYSTEM_TEST_SETTLE_DELAY_MS",
            Self::StaggerMs => "BOLETO_SYSTEM_TEST_STAGGER_MS",
            Self::MinSuccessRatio => "BOLETO_SYSTEM_TEST_MIN_SUCCESS_RATIO",
        }
    }

    /// All recognized keys.
    pub const ALL: [Self; 10] = [
        Self::BaseUrl,
        Self::RunRoot,
        Self::TimeoutSeconds,
        Self::AcceptInvalidCerts,
        Self::PollAttempts,
        Self::PollDelayMs,
        Self::LoadSize,
        Self::SettleDelayMs,
        Self::StaggerMs,
        Self::MinSuccessRatio,
    ];
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemTestConfig {
    /// Orchestrator base URL including the context path.
    pub base_url: String,
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
    /// Accept invalid TLS certificates; dev environments use self-signed chains.
    pub accept_invalid_certs: bool,
    /// Query polling policy.
    pub retry: RetryPolicy,
    /// Load suite profile.
    pub load: LoadProfile,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            run_root: None,
            timeout: None,
            accept_invalid_certs: true,
            retry: RetryPolicy::default(),
            load: LoadProfile::default(),
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout or ratio).
    pub fn load() -> Result<Self, String> {
        let defaults = Self::default();
        let base_url = read_env_nonempty(SystemTestEnv::BaseUrl.as_str())?
            .map_or(defaults.base_url, |value| value.trim().to_string());
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let accept_invalid_certs = parse_bool_env(
            SystemTestEnv::AcceptInvalidCerts.as_str(),
            read_env_nonempty(SystemTestEnv::AcceptInvalidCerts.as_str())?,
            defaults.accept_invalid_certs,
        )?;

        let retry = RetryPolicy::new(
            parse_positive(SystemTestEnv::PollAttempts, defaults.retry.max_attempts)?,
            parse_millis(SystemTestEnv::PollDelayMs, defaults.retry.delay)?,
        );
        let load = LoadProfile {
            batch_size: parse_positive(SystemTestEnv::LoadSize, defaults.load.batch_size)?,
            settle_delay: parse_millis(SystemTestEnv::SettleDelayMs, defaults.load.settle_delay)?,
            stagger: parse_millis(SystemTestEnv::StaggerMs, defaults.load.stagger)?,
            retry,
            min_success_ratio: parse_ratio(
                SystemTestEnv::MinSuccessRatio,
                defaults.load.min_success_ratio,
            )?,
            ..defaults.load
        };
        Ok(Self {
            base_url,
            run_root,
            timeout,
            accept_invalid_certs,
            retry,
            load,
        })
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub const fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a positive integer, falling back to `default` when unset.
fn parse_positive<T>(key: SystemTestEnv, default: T) -> Result<T, String>
where
    T: FromStr + PartialEq + Default,
{
    let name = key.as_str();
    let Some(raw) = read_env_nonempty(name)? else {
        return Ok(default);
    };
    let value: T = raw.trim().parse().map_err(|_| format!("{name} must be a positive integer"))?;
    if value == T::default() {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(value)
}

/// Parses a millisecond duration; zero is allowed.
fn parse_millis(key: SystemTestEnv, default: Duration) -> Result<Duration, String> {
    let name = key.as_str();
    let Some(raw) = read_env_nonempty(name)? else {
        return Ok(default);
    };
    let millis: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a non-negative integer number of milliseconds"))?;
    Ok(Duration::from_millis(millis))
}

/// Parses a ratio within `[0, 1]`.
fn parse_ratio(key: SystemTestEnv, default: f64) -> Result<f64, String> {
    let name = key.as_str();
    let Some(raw) = read_env_nonempty(name)? else {
        return Ok(default);
    };
    let ratio: f64 = raw.trim().parse().map_err(|_| format!("{name} must be a number"))?;
    if !(0.0 ..= 1.0).contains(&ratio) {
        return Err(format!("{name} must be within [0, 1]"));
    }
    Ok(ratio)
}

/// Parses a boolean environment variable.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
fn parse_bool_env(name: &str, raw: Option<String>, default: bool) -> Result<bool, String> {
    let Some(value) = raw else {
        return Ok(default);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(format!("{name} must be 1, 0, true, or false"))
}

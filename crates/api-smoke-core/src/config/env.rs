// crates/api-smoke-core/src/config/env.rs
// ============================================================================
// Module: Smoke Environment
// Description: Environment-backed overrides for smoke configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or blank values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for smoke configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokeEnv {
    /// Backend base URL.
    BaseUrl,
    /// Per-request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Bearer token for protected routes.
    BearerToken,
    /// Login email used by login checks and case setup.
    LoginEmail,
    /// Login password used by login checks and case setup.
    LoginPassword,
}

impl SmokeEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 5] = [
        Self::BaseUrl,
        Self::TimeoutSeconds,
        Self::BearerToken,
        Self::LoginEmail,
        Self::LoginPassword,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "API_SMOKE_BASE_URL",
            Self::TimeoutSeconds => "API_SMOKE_TIMEOUT_SEC",
            Self::BearerToken => "API_SMOKE_BEARER_TOKEN",
            Self::LoginEmail => "API_SMOKE_LOGIN_EMAIL",
            Self::LoginPassword => "API_SMOKE_LOGIN_PASSWORD",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Values read from the environment; `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct EnvOverrides {
    /// Base URL override.
    pub(crate) base_url: Option<String>,
    /// Timeout override.
    pub(crate) timeout: Option<Duration>,
    /// Bearer token override.
    pub(crate) bearer_token: Option<String>,
    /// Login email override.
    pub(crate) login_email: Option<String>,
    /// Login password override.
    pub(crate) login_password: Option<String>,
}

impl EnvOverrides {
    /// Reads every smoke variable from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is blank, or fails
    /// validation.
    pub(crate) fn load() -> Result<Self, String> {
        let timeout = read_env_nonempty(SmokeEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SmokeEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        Ok(Self {
            base_url: read_env_nonempty(SmokeEnv::BaseUrl.as_str())?,
            timeout,
            bearer_token: read_env_nonempty(SmokeEnv::BearerToken.as_str())?,
            login_email: read_env_nonempty(SmokeEnv::LoginEmail.as_str())?,
            login_password: read_env_nonempty(SmokeEnv::LoginPassword.as_str())?,
        })
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

/// Reads an environment variable and rejects blank values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive number of seconds.
///
/// # Errors
///
/// Returns an error when the value is blank, non-numeric, or zero.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

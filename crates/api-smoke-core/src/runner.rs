// crates/api-smoke-core/src/runner.rs
// ============================================================================
// Module: Contract Check Runner
// Description: Sends one request per contract and judges the response.
// Purpose: Turn a contract and concrete overrides into a pass/fail outcome.
// Dependencies: reqwest, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`ContractRunner::run`] issues one blocking HTTP call bounded by the
//! configured timeout and hands the [`Invocation`] to [`judge`]. Judgement is a
//! pure function so it can be exercised without a network.
//!
//! Exit branches, in order:
//! - transport failure (connect, timeout, body read): never retried;
//! - status mismatch;
//! - body parse failure, only when a body rule applies to the status;
//! - contract violation naming the field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::error::Error as _;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::SmokeConfig;
use crate::contract::AuthRequirement;
use crate::contract::Contract;
use crate::contract::HttpMethod;
use crate::outcome::CheckFailure;
use crate::outcome::CheckOutcome;
use crate::overrides::RequestOverrides;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Media type sent in `Accept` and, for bodies, `Content-Type`.
const JSON_MEDIA_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing a runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Base URL failed to parse or uses an unsupported scheme.
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
}

// ============================================================================
// SECTION: Invocation
// ============================================================================

/// Response body as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Body did not parse.
    Invalid {
        /// Raw body text.
        raw: String,
        /// Parser error text.
        error: String,
    },
}

impl ResponseBody {
    /// Parses raw body text.
    #[must_use]
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Self::Json(value),
            Err(err) => Self::Invalid {
                raw,
                error: err.to_string(),
            },
        }
    }

    /// Returns the parsed JSON, if any.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Invalid {
                ..
            } => None,
        }
    }
}

/// Outcome of sending one request.
///
/// # Invariants
/// - Created per request and discarded after judgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Resolved request path.
    pub path: String,
    /// Received status code.
    pub status: u16,
    /// Received body.
    pub body: ResponseBody,
    /// Wall-clock time from send to full body.
    pub elapsed: Duration,
}

// ============================================================================
// SECTION: Judgement
// ============================================================================

/// Judges an invocation against its contract.
///
/// # Errors
///
/// Returns the first [`CheckFailure`] hit: status mismatch, body parse
/// failure, or contract violation.
pub fn judge(contract: &Contract, invocation: &Invocation) -> Result<(), CheckFailure> {
    let expected = contract.expected_statuses();
    if !expected.contains(invocation.status) {
        return Err(CheckFailure::StatusMismatch {
            expected: expected.clone(),
            actual: invocation.status,
        });
    }
    let Some(rule) = contract.expectation().rule_for(invocation.status) else {
        return Ok(());
    };
    match &invocation.body {
        ResponseBody::Json(body) => rule.evaluate(body).map_err(CheckFailure::ContractViolation),
        ResponseBody::Invalid {
            error,
            ..
        } => Err(CheckFailure::BodyParseFailure {
            error: error.clone(),
        }),
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Blocking HTTP runner for contracts.
///
/// # Invariants
/// - Calls are sequential; the runner holds no mutable state.
#[derive(Debug, Clone)]
pub struct ContractRunner {
    /// Shared blocking client carrying the timeout.
    client: Client,
    /// Backend base URL.
    base_url: Url,
    /// Token for protected routes when the call supplies none.
    bearer_token: Option<String>,
}

impl ContractRunner {
    /// Creates a runner from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the base URL is invalid or the client cannot be built.
    pub fn new(config: &SmokeConfig) -> Result<Self, RunnerError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| RunnerError::ClientBuild(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Returns the backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Runs one check.
    #[must_use]
    pub fn run(&self, contract: &Contract, overrides: &RequestOverrides) -> CheckOutcome {
        self.run_capturing(contract, overrides).0
    }

    /// Runs one check and also returns the invocation when a response arrived.
    #[must_use]
    pub fn run_capturing(
        &self,
        contract: &Contract,
        overrides: &RequestOverrides,
    ) -> (CheckOutcome, Option<Invocation>) {
        let (outcome, invocation) = match self.invoke(contract, overrides) {
            Ok(invocation) => {
                let result = judge(contract, &invocation);
                let outcome = CheckOutcome {
                    contract: contract.name().to_string(),
                    method: contract.method(),
                    path: invocation.path.clone(),
                    status: Some(invocation.status),
                    elapsed: Some(invocation.elapsed),
                    result,
                };
                (outcome, Some(invocation))
            }
            Err(failure) => {
                let outcome = CheckOutcome {
                    contract: contract.name().to_string(),
                    method: contract.method(),
                    path: contract
                        .resolve_path(&overrides.path_params)
                        .unwrap_or_else(|_| contract.path().to_string()),
                    status: None,
                    elapsed: None,
                    result: Err(failure),
                };
                (outcome, None)
            }
        };
        if outcome.passed() {
            info!(contract = %outcome.contract, status = ?outcome.status, "check passed");
        } else {
            warn!(contract = %outcome.contract, diagnostic = %outcome.diagnostic(), "check failed");
        }
        (outcome, invocation)
    }

    /// Sends the request without judging it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure::TransportFailure`] when the request cannot be
    /// built, sent, or its body read within the timeout.
    pub fn invoke(
        &self,
        contract: &Contract,
        overrides: &RequestOverrides,
    ) -> Result<Invocation, CheckFailure> {
        let path = contract.resolve_path(&overrides.path_params).map_err(|name| {
            CheckFailure::TransportFailure {
                error: format!("unresolved path parameter `{name}`"),
            }
        })?;
        let url = self.endpoint_url(&path, &overrides.apply_query(contract.query()))?;
        let body = overrides.apply_body(contract.body());
        let token = match contract.auth() {
            AuthRequirement::Bearer => {
                overrides.bearer_token.as_deref().or(self.bearer_token.as_deref())
            }
            AuthRequirement::None => overrides.bearer_token.as_deref(),
        };

        let mut request = self
            .client
            .request(to_reqwest_method(contract.method()), url.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        for (name, value) in &overrides.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &body {
            let bytes = serde_json::to_vec(body).map_err(|err| CheckFailure::TransportFailure {
                error: format!("request body serialization failed: {err}"),
            })?;
            request = request.header(CONTENT_TYPE, JSON_MEDIA_TYPE).body(bytes);
        }

        debug!(
            contract = contract.name(),
            method = contract.method().as_str(),
            url = %url,
            authenticated = token.is_some(),
            "sending request"
        );
        let started = Instant::now();
        let response = request.send().map_err(|err| transport_failure(&err))?;
        let status = response.status().as_u16();
        let raw = response.text().map_err(|err| transport_failure(&err))?;
        let elapsed = started.elapsed();
        Ok(Invocation {
            path,
            status,
            body: ResponseBody::parse(raw),
            elapsed,
        })
    }

    /// Joins the base URL, path, and query into a request URL.
    fn endpoint_url(
        &self,
        path: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Url, CheckFailure> {
        let joined = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        let mut url = Url::parse(&joined).map_err(|err| CheckFailure::TransportFailure {
            error: format!("invalid request url `{joined}`: {err}"),
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates the base URL.
fn parse_base_url(raw: &str) -> Result<Url, RunnerError> {
    let url = Url::parse(raw).map_err(|err| RunnerError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RunnerError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

/// Maps a contract method onto the client method.
const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Flattens a client error and its sources into one transport failure.
fn transport_failure(err: &reqwest::Error) -> CheckFailure {
    let mut error = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        error.push_str(": ");
        error.push_str(&cause.to_string());
        source = cause.source();
    }
    CheckFailure::TransportFailure {
        error,
    }
}

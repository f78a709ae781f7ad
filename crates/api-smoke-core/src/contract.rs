// crates/api-smoke-core/src/contract.rs
// ============================================================================
// Module: Endpoint Contracts
// Description: Declarative description of one endpoint call and its response.
// Purpose: Give the runner everything it needs to send and judge a request.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Contract`] names an HTTP method, a path template, default query and body
//! values, the accepted status codes, and the body rule that must hold for the
//! parsed response. Contracts are immutable once built and are created when a
//! case is authored.
//!
//! Invariants:
//! - The accepted [`StatusSet`] is never empty.
//! - Paths start with `/` and every `{` placeholder is closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::rules::BodyRule;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Lowest HTTP status code accepted in a status set.
const MIN_STATUS: u16 = 100;
/// Highest HTTP status code accepted in a status set.
const MAX_STATUS: u16 = 599;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while authoring contracts, steps, or probes.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A status set was declared without any codes.
    #[error("status set must not be empty")]
    EmptyStatusSet,
    /// A contract was built without an expected status set.
    #[error("contract `{0}` declares no expected status set")]
    MissingStatusSet(String),
    /// A status code or range falls outside 100..=599.
    #[error("status {0} is not a valid HTTP status code")]
    InvalidStatus(u16),
    /// A status range has its bounds reversed.
    #[error("status range {low}..={high} is empty")]
    InvalidStatusRange {
        /// Lower bound.
        low: u16,
        /// Upper bound.
        high: u16,
    },
    /// The path is not absolute or has an unbalanced placeholder.
    #[error("contract `{name}` has invalid path `{path}`")]
    InvalidPath {
        /// Contract name.
        name: String,
        /// Offending path.
        path: String,
    },
    /// A latency probe was declared with zero iterations.
    #[error("latency probe requires at least one iteration")]
    ZeroIterations,
    /// A latency probe was declared with a zero ceiling.
    #[error("latency probe requires a non-zero ceiling")]
    ZeroCeiling,
}

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// HTTP methods used by contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Status Sets
// ============================================================================

/// Inclusive range of status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StatusRange {
    /// Lowest accepted code.
    pub low: u16,
    /// Highest accepted code.
    pub high: u16,
}

/// Non-empty set of accepted HTTP status codes.
///
/// # Invariants
/// - Holds at least one range.
/// - Every bound lies within 100..=599.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusSet {
    /// Sorted, deduplicated ranges.
    ranges: Vec<StatusRange>,
}

impl StatusSet {
    /// Builds a set from discrete status codes.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when `codes` is empty or holds an invalid code.
    pub fn of(codes: &[u16]) -> Result<Self, ContractError> {
        if codes.is_empty() {
            return Err(ContractError::EmptyStatusSet);
        }
        let mut ranges = Vec::with_capacity(codes.len());
        for code in codes {
            validate_status(*code)?;
            ranges.push(StatusRange {
                low: *code,
                high: *code,
            });
        }
        ranges.sort_unstable();
        ranges.dedup();
        Ok(Self {
            ranges,
        })
    }

    /// Builds a set covering `low..=high`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when a bound is invalid or `low > high`.
    pub fn range(low: u16, high: u16) -> Result<Self, ContractError> {
        validate_status(low)?;
        validate_status(high)?;
        if low > high {
            return Err(ContractError::InvalidStatusRange {
                low,
                high,
            });
        }
        Ok(Self {
            ranges: vec![StatusRange {
                low,
                high,
            }],
        })
    }

    /// Builds a set covering every code from `low` up to 599.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when `low` is not a valid status code.
    pub fn at_least(low: u16) -> Result<Self, ContractError> {
        Self::range(low, MAX_STATUS)
    }

    /// Returns true when `status` is accepted.
    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.ranges.iter().any(|range| range.low <= status && status <= range.high)
    }

    /// Returns the ranges backing this set.
    #[must_use]
    pub fn ranges(&self) -> &[StatusRange] {
        &self.ranges
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self
            .ranges
            .iter()
            .map(|range| {
                if range.low == range.high {
                    range.low.to_string()
                } else {
                    format!("{}..={}", range.low, range.high)
                }
            })
            .collect();
        match labels.split_last() {
            Some((last, rest)) if !rest.is_empty() => {
                write!(f, "{} or {last}", rest.join(", "))
            }
            Some((last, _)) => f.write_str(last),
            None => Ok(()),
        }
    }
}

/// Rejects codes outside the HTTP status range.
const fn validate_status(code: u16) -> Result<(), ContractError> {
    if code < MIN_STATUS || code > MAX_STATUS {
        return Err(ContractError::InvalidStatus(code));
    }
    Ok(())
}

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Whether a contract needs a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRequirement {
    /// Public route.
    #[default]
    None,
    /// Protected route; the runner attaches `Authorization: Bearer` when a token is known.
    Bearer,
}

/// How the response body is judged once the status is accepted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BodyExpectation {
    /// The body is not parsed.
    #[default]
    Unchecked,
    /// The body must parse as JSON and satisfy the rule.
    Json {
        /// Rule applied to every accepted status.
        rule: BodyRule,
    },
    /// The first entry whose status set matches applies; no match means unchecked.
    ByStatus {
        /// Status-scoped rules in priority order.
        cases: Vec<(StatusSet, BodyRule)>,
    },
}

impl BodyExpectation {
    /// Returns the rule that applies to `status`, if any.
    #[must_use]
    pub fn rule_for(&self, status: u16) -> Option<&BodyRule> {
        match self {
            Self::Unchecked => None,
            Self::Json {
                rule,
            } => Some(rule),
            Self::ByStatus {
                cases,
            } => cases.iter().find(|(statuses, _)| statuses.contains(status)).map(|(_, rule)| rule),
        }
    }
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// Declarative description of one endpoint call.
///
/// # Invariants
/// - Built only through [`ContractBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contract {
    /// Stable contract name used in diagnostics.
    name: String,
    /// HTTP method.
    method: HttpMethod,
    /// Path template relative to the base URL.
    path: String,
    /// Bearer requirement.
    auth: AuthRequirement,
    /// Default query parameters.
    query: BTreeMap<String, String>,
    /// Default JSON body.
    body: Option<Value>,
    /// Accepted status codes.
    expected_statuses: StatusSet,
    /// Body judgement.
    expectation: BodyExpectation,
}

impl Contract {
    /// Starts a builder for a contract.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> ContractBuilder {
        ContractBuilder {
            name: name.into(),
            method,
            path: path.into(),
            auth: AuthRequirement::None,
            query: BTreeMap::new(),
            body: None,
            expected_statuses: None,
            expectation: BodyExpectation::Unchecked,
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the bearer requirement.
    #[must_use]
    pub const fn auth(&self) -> AuthRequirement {
        self.auth
    }

    /// Returns the default query parameters.
    #[must_use]
    pub const fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Returns the default JSON body.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the accepted status codes.
    #[must_use]
    pub const fn expected_statuses(&self) -> &StatusSet {
        &self.expected_statuses
    }

    /// Returns the body judgement.
    #[must_use]
    pub const fn expectation(&self) -> &BodyExpectation {
        &self.expectation
    }

    /// Substitutes `{name}` placeholders in the path.
    ///
    /// # Errors
    ///
    /// Returns the first placeholder name with no value in `params`.
    pub fn resolve_path(&self, params: &BTreeMap<String, String>) -> Result<String, String> {
        let mut resolved = String::with_capacity(self.path.len());
        let mut rest = self.path.as_str();
        while let Some(open) = rest.find('{') {
            resolved.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| after.to_string())?;
            let key = &after[..close];
            let value = params.get(key).ok_or_else(|| key.to_string())?;
            resolved.push_str(value);
            rest = &after[close + 1..];
        }
        resolved.push_str(rest);
        Ok(resolved)
    }
}

/// Builder for [`Contract`].
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    /// Contract name.
    name: String,
    /// HTTP method.
    method: HttpMethod,
    /// Path template.
    path: String,
    /// Bearer requirement.
    auth: AuthRequirement,
    /// Default query parameters.
    query: BTreeMap<String, String>,
    /// Default JSON body.
    body: Option<Value>,
    /// Accepted status codes, required before build.
    expected_statuses: Option<StatusSet>,
    /// Body judgement.
    expectation: BodyExpectation,
}

impl ContractBuilder {
    /// Marks the route as protected by a bearer token.
    #[must_use]
    pub const fn bearer(mut self) -> Self {
        self.auth = AuthRequirement::Bearer;
        self
    }

    /// Adds a default query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets the default JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the accepted status codes.
    #[must_use]
    pub fn expect(mut self, statuses: StatusSet) -> Self {
        self.expected_statuses = Some(statuses);
        self
    }

    /// Requires the body to parse as JSON and satisfy `rule`.
    #[must_use]
    pub fn expect_json(mut self, rule: BodyRule) -> Self {
        self.expectation = BodyExpectation::Json {
            rule,
        };
        self
    }

    /// Sets the body judgement directly.
    #[must_use]
    pub fn expect_body(mut self, expectation: BodyExpectation) -> Self {
        self.expectation = expectation;
        self
    }

    /// Validates and builds the contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when no status set was given or the path is malformed.
    pub fn build(self) -> Result<Contract, ContractError> {
        let Some(expected_statuses) = self.expected_statuses else {
            return Err(ContractError::MissingStatusSet(self.name));
        };
        if !path_is_well_formed(&self.path) {
            return Err(ContractError::InvalidPath {
                name: self.name,
                path: self.path,
            });
        }
        Ok(Contract {
            name: self.name,
            method: self.method,
            path: self.path,
            auth: self.auth,
            query: self.query,
            body: self.body,
            expected_statuses,
            expectation: self.expectation,
        })
    }
}

/// Checks that a path is absolute and its placeholders are balanced and named.
fn path_is_well_formed(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    let mut open = false;
    let mut name_len = 0usize;
    for ch in path.chars() {
        match ch {
            '{' if open => return false,
            '{' => {
                open = true;
                name_len = 0;
            }
            '}' if !open || name_len == 0 => return false,
            '}' => open = false,
            _ if open => name_len += 1,
            _ => {}
        }
    }
    !open
}

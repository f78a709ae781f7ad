// crates/api-smoke-core/src/outcome.rs
// ============================================================================
// Module: Check Outcomes
// Description: Failure taxonomy and per-check results.
// Purpose: Report pass/fail with a diagnostic naming expected vs. actual.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every check ends in exactly one of five states: pass, or one of the four
//! terminal [`CheckFailure`] kinds. There is no partial credit and no retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::contract::HttpMethod;
use crate::contract::StatusSet;
use crate::rules::Violation;

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Terminal failure of a single check.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// Connection, timeout, or body read failure. Never retried.
    #[error("transport failure: {error}")]
    TransportFailure {
        /// Underlying error text.
        error: String,
    },
    /// Status code outside the contract's accepted set.
    #[error("expected status {expected}, got {actual}")]
    StatusMismatch {
        /// Accepted codes.
        expected: StatusSet,
        /// Received code.
        actual: u16,
    },
    /// Body is not valid JSON where JSON was expected.
    #[error("response body is not valid JSON: {error}")]
    BodyParseFailure {
        /// Parser error text.
        error: String,
    },
    /// JSON parsed but a required field is missing or invalid.
    #[error("contract violation at {0}")]
    ContractViolation(Violation),
}

impl CheckFailure {
    /// Returns the stable failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::TransportFailure {
                ..
            } => FailureKind::TransportFailure,
            Self::StatusMismatch {
                ..
            } => FailureKind::StatusMismatch,
            Self::BodyParseFailure {
                ..
            } => FailureKind::BodyParseFailure,
            Self::ContractViolation(_) => FailureKind::ContractViolation,
        }
    }
}

/// Stable failure labels used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// See [`CheckFailure::TransportFailure`].
    TransportFailure,
    /// See [`CheckFailure::StatusMismatch`].
    StatusMismatch,
    /// See [`CheckFailure::BodyParseFailure`].
    BodyParseFailure,
    /// See [`CheckFailure::ContractViolation`].
    ContractViolation,
    /// Repeated checks passed but their average latency reached the ceiling.
    LatencyCeiling,
}

impl FailureKind {
    /// Returns the stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TransportFailure => "transport_failure",
            Self::StatusMismatch => "status_mismatch",
            Self::BodyParseFailure => "body_parse_failure",
            Self::ContractViolation => "contract_violation",
            Self::LatencyCeiling => "latency_ceiling",
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of judging one invocation against one contract.
///
/// # Invariants
/// - `status` and `elapsed` are `None` only for transport failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Contract name.
    pub contract: String,
    /// HTTP method used.
    pub method: HttpMethod,
    /// Resolved request path.
    pub path: String,
    /// Received status code.
    pub status: Option<u16>,
    /// Wall-clock time from send to full body.
    pub elapsed: Option<Duration>,
    /// Judgement.
    pub result: Result<(), CheckFailure>,
}

impl CheckOutcome {
    /// Returns true when the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&CheckFailure> {
        match &self.result {
            Ok(()) => None,
            Err(failure) => Some(failure),
        }
    }

    /// Human-readable diagnostic naming the contract and the verdict.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let target = format!("{} {} {}", self.contract, self.method, self.path);
        match &self.result {
            Ok(()) => {
                let status = self.status.map_or_else(|| "-".to_string(), |code| code.to_string());
                let millis = self.elapsed.map_or(0, |elapsed| elapsed.as_millis());
                format!("{target}: ok (status {status}, {millis} ms)")
            }
            Err(failure) => format!("{target}: {failure}"),
        }
    }
}

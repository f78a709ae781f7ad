// crates/api-smoke-core/src/latency.rs
// ============================================================================
// Module: Latency Probe
// Description: Repeats a read-only check and gates on average latency.
// Purpose: Confirm a route stays healthy and responsive across repeated calls.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`LatencyProbe`] runs the same check `iterations` times back to back and
//! records wall-clock latency for each call. The probe stops at the first
//! failing check. Its verdict fails when any check failed or when the average
//! latency is not below the ceiling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::contract::Contract;
use crate::contract::ContractError;
use crate::outcome::CheckFailure;
use crate::outcome::CheckOutcome;
use crate::outcome::FailureKind;
use crate::overrides::RequestOverrides;
use crate::runner::ContractRunner;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure of a repeated check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatencyFailure {
    /// One of the repeated checks failed.
    #[error("iteration {iteration} failed: {failure}")]
    Check {
        /// One-based iteration number.
        iteration: usize,
        /// Underlying failure.
        failure: CheckFailure,
    },
    /// Every check passed but the average latency reached the ceiling.
    #[error("average latency {average_ms} ms is not below the {ceiling_ms} ms ceiling")]
    CeilingExceeded {
        /// Observed average in milliseconds.
        average_ms: u128,
        /// Ceiling in milliseconds.
        ceiling_ms: u128,
    },
}

impl LatencyFailure {
    /// Returns the stable failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Check {
                failure,
                ..
            } => failure.kind(),
            Self::CeilingExceeded {
                ..
            } => FailureKind::LatencyCeiling,
        }
    }
}

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Repeated sequential check with an average-latency ceiling.
///
/// # Invariants
/// - `iterations` and `ceiling` are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProbe {
    /// Number of sequential calls.
    iterations: u32,
    /// Average latency must stay strictly below this.
    ceiling: Duration,
}

impl LatencyProbe {
    /// Creates a probe.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when `iterations` or `ceiling` is zero.
    pub fn new(iterations: u32, ceiling: Duration) -> Result<Self, ContractError> {
        if iterations == 0 {
            return Err(ContractError::ZeroIterations);
        }
        if ceiling.is_zero() {
            return Err(ContractError::ZeroCeiling);
        }
        Ok(Self {
            iterations,
            ceiling,
        })
    }

    /// Returns the number of calls.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the average-latency ceiling.
    #[must_use]
    pub const fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// Runs the check repeatedly, stopping at the first failure.
    #[must_use]
    pub fn run(
        &self,
        runner: &ContractRunner,
        contract: &Contract,
        overrides: &RequestOverrides,
    ) -> LatencyReport {
        let mut outcomes = Vec::new();
        for _ in 0..self.iterations {
            let outcome = runner.run(contract, overrides);
            let passed = outcome.passed();
            outcomes.push(outcome);
            if !passed {
                break;
            }
        }
        let report = LatencyReport {
            outcomes,
            ceiling: self.ceiling,
        };
        info!(
            contract = contract.name(),
            calls = report.outcomes.len(),
            average_ms = report.average().map_or(0, |average| average.as_millis()),
            "latency probe finished"
        );
        report
    }
}

impl fmt::Display for LatencyProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} calls, average below {} ms", self.iterations, self.ceiling.as_millis())
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcomes and timings of a latency probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyReport {
    /// One outcome per call made, in order.
    pub outcomes: Vec<CheckOutcome>,
    /// Ceiling the average is compared against.
    pub ceiling: Duration,
}

impl LatencyReport {
    /// Returns the latencies of calls that received a response.
    #[must_use]
    pub fn samples(&self) -> Vec<Duration> {
        self.outcomes.iter().filter_map(|outcome| outcome.elapsed).collect()
    }

    /// Returns the mean latency, if any call received a response.
    #[must_use]
    pub fn average(&self) -> Option<Duration> {
        let samples = self.samples();
        let count = u32::try_from(samples.len()).ok().filter(|count| *count > 0)?;
        Some(samples.iter().sum::<Duration>() / count)
    }

    /// Returns the slowest latency, if any call received a response.
    #[must_use]
    pub fn max(&self) -> Option<Duration> {
        self.samples().into_iter().max()
    }

    /// Judges the probe.
    ///
    /// # Errors
    ///
    /// Returns [`LatencyFailure`] for the first failed call or a breached ceiling.
    pub fn verdict(&self) -> Result<(), LatencyFailure> {
        for (index, outcome) in self.outcomes.iter().enumerate() {
            if let Err(failure) = &outcome.result {
                return Err(LatencyFailure::Check {
                    iteration: index + 1,
                    failure: failure.clone(),
                });
            }
        }
        match self.average() {
            Some(average) if average >= self.ceiling => Err(LatencyFailure::CeilingExceeded {
                average_ms: average.as_millis(),
                ceiling_ms: self.ceiling.as_millis(),
            }),
            _ => Ok(()),
        }
    }
}

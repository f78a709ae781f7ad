// crates/api-smoke-core/src/suite.rs
// ============================================================================
// Module: Smoke Cases and Suites
// Description: Ordered, fail-fast sequences of checks grouped into a suite.
// Purpose: Run named cases with optional login setup and collect reports.
// Dependencies: serde_json, tracing
// ============================================================================

//! ## Overview
//! A [`SmokeCase`] is an ordered list of [`CaseStep`]s. Steps run in order and
//! the case stops at the first failing step; later steps are reported as
//! skipped. A case may declare a [`CaseSetup::Login`] that signs in first and
//! hands the returned token to every step. [`SuiteRunner::run_suite`] runs
//! every case in order regardless of earlier failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use serde_json::Value;
use tracing::info;
use tracing::warn;

use crate::contract::Contract;
use crate::latency::LatencyProbe;
use crate::outcome::CheckFailure;
use crate::overrides::RequestOverrides;
use crate::report::CaseReport;
use crate::report::StepReport;
use crate::report::SuiteReport;
use crate::rules::Violation;
use crate::runner::ContractRunner;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Label given to the login setup step in reports.
const SETUP_LABEL: &str = "login setup";
/// Login response fields that may carry the token, in priority order.
const DEFAULT_TOKEN_FIELDS: [&str; 2] = ["token", "accessToken"];

// ============================================================================
// SECTION: Case Model
// ============================================================================

/// Work done before a case's steps.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseSetup {
    /// Sign in and use the returned token as the bearer for every step.
    Login {
        /// Login contract.
        contract: Contract,
        /// Concrete credentials for the call.
        overrides: RequestOverrides,
        /// Response fields that may carry the token.
        token_fields: Vec<String>,
    },
}

impl CaseSetup {
    /// Login setup reading the token from `token` or `accessToken`.
    #[must_use]
    pub fn login(contract: Contract, overrides: RequestOverrides) -> Self {
        Self::Login {
            contract,
            overrides,
            token_fields: DEFAULT_TOKEN_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// How a step exercises its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// One call.
    Once,
    /// Repeated calls gated on average latency.
    Repeated(LatencyProbe),
}

/// One labelled check within a case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseStep {
    /// Label shown in reports.
    pub label: String,
    /// Contract to check.
    pub contract: Contract,
    /// Concrete values for the call.
    pub overrides: RequestOverrides,
    /// Single or repeated.
    pub mode: StepMode,
}

impl CaseStep {
    /// Step making one call with no overrides.
    #[must_use]
    pub fn once(label: impl Into<String>, contract: Contract) -> Self {
        Self {
            label: label.into(),
            contract,
            overrides: RequestOverrides::default(),
            mode: StepMode::Once,
        }
    }

    /// Step repeating the call under a latency probe.
    #[must_use]
    pub fn repeated(label: impl Into<String>, contract: Contract, probe: LatencyProbe) -> Self {
        Self {
            label: label.into(),
            contract,
            overrides: RequestOverrides::default(),
            mode: StepMode::Repeated(probe),
        }
    }

    /// Replaces the step's overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: RequestOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Named, ordered sequence of checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeCase {
    /// Stable id, e.g. `TC001`.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Optional setup run before the steps.
    pub setup: Option<CaseSetup>,
    /// Steps in execution order.
    pub steps: Vec<CaseStep>,
}

impl SmokeCase {
    /// Creates an empty case.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            setup: None,
            steps: Vec::new(),
        }
    }

    /// Sets the case setup.
    #[must_use]
    pub fn with_setup(mut self, setup: CaseSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: CaseStep) -> Self {
        self.steps.push(step);
        self
    }
}

// ============================================================================
// SECTION: Suite Runner
// ============================================================================

/// Runs cases through a [`ContractRunner`].
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    /// Runner used for every call.
    runner: ContractRunner,
}

impl SuiteRunner {
    /// Wraps a contract runner.
    #[must_use]
    pub const fn new(runner: ContractRunner) -> Self {
        Self {
            runner,
        }
    }

    /// Returns the underlying runner.
    #[must_use]
    pub const fn runner(&self) -> &ContractRunner {
        &self.runner
    }

    /// Runs every case in order, never stopping early.
    #[must_use]
    pub fn run_suite(&self, cases: &[SmokeCase]) -> SuiteReport {
        let reports = cases.iter().map(|case| self.run_case(case)).collect();
        let report = SuiteReport::new(self.runner.base_url(), reports);
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            "suite finished"
        );
        report
    }

    /// Runs one case, stopping at its first failing step.
    #[must_use]
    pub fn run_case(&self, case: &SmokeCase) -> CaseReport {
        let started = Instant::now();
        let mut steps = Vec::with_capacity(case.steps.len() + 1);
        let mut token = None;
        let mut failed = false;

        if let Some(setup) = &case.setup {
            let (report, acquired) = self.run_setup(setup);
            failed = !report.passed();
            steps.push(report);
            token = acquired;
        }

        for step in &case.steps {
            if failed {
                steps.push(StepReport::skipped(&step.label, &step.contract));
                continue;
            }
            let mut overrides = step.overrides.clone();
            if let Some(token) = &token {
                overrides.bearer_token.get_or_insert_with(|| token.clone());
            }
            let report = match step.mode {
                StepMode::Once => {
                    let outcome = self.runner.run(&step.contract, &overrides);
                    StepReport::from_check(&step.label, &outcome)
                }
                StepMode::Repeated(probe) => StepReport::from_latency(
                    &step.label,
                    &step.contract,
                    &probe.run(&self.runner, &step.contract, &overrides),
                ),
            };
            failed = !report.passed();
            steps.push(report);
        }

        let report = CaseReport::new(&case.id, &case.title, started.elapsed(), steps);
        if report.passed {
            info!(case = %report.id, duration_ms = report.duration_ms, "case passed");
        } else {
            let diagnostic = report.first_failure().map_or("", |step| step.diagnostic.as_str());
            warn!(case = %report.id, diagnostic, "case failed");
        }
        report
    }

    /// Runs the setup and returns its report plus the acquired token.
    fn run_setup(&self, setup: &CaseSetup) -> (StepReport, Option<String>) {
        let CaseSetup::Login {
            contract,
            overrides,
            token_fields,
        } = setup;
        let (mut outcome, invocation) = self.runner.run_capturing(contract, overrides);
        if !outcome.passed() {
            return (StepReport::from_check(SETUP_LABEL, &outcome), None);
        }
        let token = invocation
            .as_ref()
            .and_then(|invocation| invocation.body.json())
            .and_then(|body| extract_token(body, token_fields));
        if token.is_none() {
            outcome.result = Err(CheckFailure::ContractViolation(Violation::new(
                token_fields.join(" | "),
                "login response carries no token",
            )));
        }
        (StepReport::from_check(SETUP_LABEL, &outcome), token)
    }
}

/// Returns the first non-empty string among `fields`.
fn extract_token(body: &Value, fields: &[String]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|token| !token.is_empty())
        .map(ToString::to_string)
}

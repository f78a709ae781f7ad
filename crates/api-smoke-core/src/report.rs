// crates/api-smoke-core/src/report.rs
// ============================================================================
// Module: Smoke Reports
// Description: Serializable per-step, per-case, and per-suite results.
// Purpose: Render run results for terminals, JSON consumers, and Markdown.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Reports are plain data built from check outcomes. They serialize with
//! `serde` for canonical JSON output and render to text or Markdown for people.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::contract::Contract;
use crate::contract::HttpMethod;
use crate::latency::LatencyReport;
use crate::outcome::CheckOutcome;
use crate::outcome::FailureKind;

// ============================================================================
// SECTION: Step Reports
// ============================================================================

/// Final state of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Every check in the step passed.
    Passed,
    /// The step failed.
    Failed,
    /// An earlier step failed, so this one never ran.
    Skipped,
}

impl StepStatus {
    /// Returns the short label used in text output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "ok",
            Self::Failed => "FAIL",
            Self::Skipped => "skip",
        }
    }
}

/// Result of one step within a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step label.
    pub label: String,
    /// Contract name.
    pub contract: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Resolved path, or the template when the step never ran.
    pub path: String,
    /// Final state.
    pub status: StepStatus,
    /// Last received status code.
    pub http_status: Option<u16>,
    /// Total time spent waiting on responses.
    pub elapsed_ms: Option<u64>,
    /// Calls made, for repeated steps.
    pub iterations: Option<usize>,
    /// Average latency, for repeated steps.
    pub average_ms: Option<u64>,
    /// Failure kind when the step failed.
    pub failure: Option<FailureKind>,
    /// Human-readable verdict.
    pub diagnostic: String,
}

impl StepReport {
    /// Builds a report from a single check.
    #[must_use]
    pub fn from_check(label: &str, outcome: &CheckOutcome) -> Self {
        Self {
            label: label.to_string(),
            contract: outcome.contract.clone(),
            method: outcome.method,
            path: outcome.path.clone(),
            status: if outcome.passed() { StepStatus::Passed } else { StepStatus::Failed },
            http_status: outcome.status,
            elapsed_ms: outcome.elapsed.map(millis),
            iterations: None,
            average_ms: None,
            failure: outcome.failure().map(|failure| failure.kind()),
            diagnostic: outcome.diagnostic(),
        }
    }

    /// Builds a report from a latency probe.
    #[must_use]
    pub fn from_latency(label: &str, contract: &Contract, report: &LatencyReport) -> Self {
        let last = report.outcomes.last();
        let path = last.map_or_else(|| contract.path().to_string(), |outcome| outcome.path.clone());
        let target = format!("{} {} {path}", contract.name(), contract.method());
        let verdict = report.verdict();
        let diagnostic = match &verdict {
            Ok(()) => format!(
                "{target}: ok ({} calls, average {} ms, max {} ms, ceiling {} ms)",
                report.outcomes.len(),
                report.average().map_or(0, millis),
                report.max().map_or(0, millis),
                millis(report.ceiling),
            ),
            Err(failure) => format!("{target}: {failure}"),
        };
        Self {
            label: label.to_string(),
            contract: contract.name().to_string(),
            method: contract.method(),
            path,
            status: if verdict.is_ok() { StepStatus::Passed } else { StepStatus::Failed },
            http_status: last.and_then(|outcome| outcome.status),
            elapsed_ms: Some(millis(report.samples().iter().sum())),
            iterations: Some(report.outcomes.len()),
            average_ms: report.average().map(millis),
            failure: verdict.err().map(|failure| failure.kind()),
            diagnostic,
        }
    }

    /// Builds a report for a step that never ran.
    #[must_use]
    pub fn skipped(label: &str, contract: &Contract) -> Self {
        Self {
            label: label.to_string(),
            contract: contract.name().to_string(),
            method: contract.method(),
            path: contract.path().to_string(),
            status: StepStatus::Skipped,
            http_status: None,
            elapsed_ms: None,
            iterations: None,
            average_ms: None,
            failure: None,
            diagnostic: "skipped after an earlier failure".to_string(),
        }
    }

    /// Returns true when the step passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == StepStatus::Passed
    }
}

// ============================================================================
// SECTION: Case and Suite Reports
// ============================================================================

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// Case id, e.g. `TC001`.
    pub id: String,
    /// Case title.
    pub title: String,
    /// True when every step passed.
    pub passed: bool,
    /// Wall-clock duration of the case.
    pub duration_ms: u64,
    /// Setup and step results in execution order.
    pub steps: Vec<StepReport>,
}

impl CaseReport {
    /// Builds a case report; the case passes only if every step passed.
    #[must_use]
    pub fn new(id: &str, title: &str, duration: Duration, steps: Vec<StepReport>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            passed: !steps.is_empty() && steps.iter().all(StepReport::passed),
            duration_ms: millis(duration),
            steps,
        }
    }

    /// Returns the first failed step, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|step| step.status == StepStatus::Failed)
    }
}

/// Result of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Backend the suite ran against.
    pub base_url: String,
    /// Number of cases run.
    pub total: usize,
    /// Number of passing cases.
    pub passed: usize,
    /// Number of failing cases.
    pub failed: usize,
    /// Case results in execution order.
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Aggregates case reports.
    #[must_use]
    pub fn new(base_url: &str, cases: Vec<CaseReport>) -> Self {
        let passed = cases.iter().filter(|case| case.passed).count();
        Self {
            base_url: base_url.to_string(),
            total: cases.len(),
            passed,
            failed: cases.len() - passed,
            cases,
        }
    }

    /// Returns true when every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Renders a plain-text report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = format!("api smoke run against {}\n", self.base_url);
        for case in &self.cases {
            let verdict = if case.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "[{verdict}] {} {} ({} ms)",
                case.id, case.title, case.duration_ms
            );
            for step in &case.steps {
                let _ = writeln!(
                    out,
                    "  {:<4} {}: {}",
                    step.status.label(),
                    step.label,
                    step.diagnostic
                );
            }
        }
        let _ = writeln!(
            out,
            "{} passed, {} failed, {} total",
            self.passed, self.failed, self.total
        );
        out
    }

    /// Renders a Markdown report.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut out = String::from("# API Smoke Report\n\n");
        let _ = writeln!(out, "- Base URL: `{}`", self.base_url);
        let _ = writeln!(
            out,
            "- Cases: {} total, {} passed, {} failed",
            self.total, self.passed, self.failed
        );
        for case in &self.cases {
            let verdict = if case.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "\n## {} {}: {verdict}\n", case.id, case.title);
            let _ = writeln!(out, "| Step | Status | HTTP | ms | Detail |");
            let _ = writeln!(out, "|---|---|---|---|---|");
            for step in &case.steps {
                let http =
                    step.http_status.map_or_else(|| "-".to_string(), |code| code.to_string());
                let elapsed = step.elapsed_ms.map_or_else(|| "-".to_string(), |ms| ms.to_string());
                let _ = writeln!(
                    out,
                    "| {} | {} | {http} | {elapsed} | {} |",
                    escape_cell(&step.label),
                    step.status.label(),
                    escape_cell(&step.diagnostic)
                );
            }
        }
        out
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a duration to whole milliseconds, saturating.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Escapes text for a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

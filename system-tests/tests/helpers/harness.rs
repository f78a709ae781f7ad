// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Live Case Harness
// Description: Runs one catalog case against the configured backend.
// Purpose: Give every suite the same run, record, and verdict flow.
// Dependencies: api-smoke-core, api-smoke-catalog
// ============================================================================

use std::error::Error;

use api_smoke_catalog::CatalogContext;
use api_smoke_catalog::cases;
use api_smoke_catalog::select;
use api_smoke_core::CaseReport;
use api_smoke_core::ContractRunner;
use api_smoke_core::SmokeConfig;
use api_smoke_core::SuiteReport;
use api_smoke_core::SuiteRunner;

use super::artifacts::TestReporter;

/// Runs the catalog case `case_id` against the backend named by `API_SMOKE_*`.
pub fn run_live_case(case_id: &str) -> Result<SuiteReport, Box<dyn Error>> {
    let config = SmokeConfig::load(None)?;
    let runner = ContractRunner::new(&config)?;
    let ctx = CatalogContext::from_config(&config);
    let selected = select(cases(&ctx)?, &[case_id.to_string()])
        .map_err(|unknown| format!("unknown case id `{unknown}`"))?;
    Ok(SuiteRunner::new(runner).run_suite(&selected))
}

/// Runs one case, records its report, and fails when any step failed.
pub fn check_live_case(test_name: &str, case_id: &str) -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new(test_name)?;
    let report = run_live_case(case_id)?;
    reporter.artifacts().write_json("case_report.json", &report)?;
    reporter.artifacts().write_text("case_report.md", &report.render_markdown())?;

    let case = report.cases.first().ok_or("case did not run")?;
    let notes = step_notes(case);
    let artifacts = vec!["case_report.json".to_string(), "case_report.md".to_string()];
    if case.passed {
        reporter.finish("pass", notes, artifacts)?;
        return Ok(());
    }
    reporter.finish("fail", notes, artifacts)?;
    Err(format!("{case_id} failed:\n{}", report.render_text()).into())
}

fn step_notes(case: &CaseReport) -> Vec<String> {
    case.steps
        .iter()
        .map(|step| format!("[{}] {}: {}", step.status.label(), step.label, step.diagnostic))
        .collect()
}

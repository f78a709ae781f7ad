// crates/api-smoke-catalog/src/metrics.rs
// ============================================================================
// Module: Metrics Cases
// Description: Dashboard, history, and ROAS/ROI analysis checks.
// Purpose: Verify date-range reporting endpoints and their validation.
// Dependencies: api-smoke-core, serde_json
// ============================================================================

//! ## Overview
//! All three routes are protected. TC006 signs in first and reuses the token.
//! TC007 accepts either real data or a structured `INVALID_TOKEN` rejection
//! for the trailing 30-day window, then checks `groupBy` validation. TC008
//! requires both dates to be present and well formed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_smoke_core::BodyExpectation;
use api_smoke_core::BodyRule;
use api_smoke_core::CaseSetup;
use api_smoke_core::CaseStep;
use api_smoke_core::Contract;
use api_smoke_core::ContractError;
use api_smoke_core::HttpMethod;
use api_smoke_core::RequestOverrides;
use api_smoke_core::SmokeCase;
use api_smoke_core::StatusSet;
use serde_json::json;

use crate::auth::login_contract;
use crate::context::CatalogContext;
use crate::shapes;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Dashboard route.
pub const DASHBOARD_PATH: &str = "/api/v1/metrics/dashboard";
/// History route.
pub const HISTORY_PATH: &str = "/api/v1/metrics/history";
/// ROAS/ROI route.
pub const ANALYSIS_PATH: &str = "/api/v1/roas-roi/analysis";
/// Accepted `groupBy` values.
pub const GROUP_BY_VALUES: [&str; 3] = ["day", "week", "month"];
/// Token sent on the history window check when none is configured.
pub const PLACEHOLDER_TOKEN: &str = "valid-test-token";

// ============================================================================
// SECTION: Cases
// ============================================================================

/// TC006: dashboard metrics for a signed-in user.
pub(crate) fn dashboard_case(ctx: &CatalogContext) -> Result<SmokeCase, ContractError> {
    let range = Contract::builder("metrics.dashboard", HttpMethod::Get, DASHBOARD_PATH)
        .bearer()
        .query("startDate", "2025-01-01")
        .query("endDate", "2025-01-31")
        .expect(shapes::ok()?)
        .expect_json(BodyRule::NonEmptyObject)
        .build()?;
    let undated = Contract::builder("metrics.dashboard.undated", HttpMethod::Get, DASHBOARD_PATH)
        .bearer()
        .expect(StatusSet::of(&[200, 400, 422])?)
        .expect_body(BodyExpectation::ByStatus {
            cases: vec![(shapes::ok()?, BodyRule::IsObject)],
        })
        .build()?;
    let malformed = Contract::builder("metrics.dashboard.invalid", HttpMethod::Get, DASHBOARD_PATH)
        .bearer()
        .query("startDate", "2025-01-01")
        .query("endDate", "2025-01-31")
        .expect(shapes::rejected()?)
        .build()?;

    Ok(SmokeCase::new("TC006", "Dashboard metrics")
        .with_setup(CaseSetup::login(login_contract(&ctx.credentials)?, RequestOverrides::new()))
        .step(CaseStep::once("valid range", range))
        .step(CaseStep::once("no dates", undated))
        .step(
            CaseStep::once("malformed start", malformed.clone())
                .with_overrides(RequestOverrides::new().query("startDate", "invalid-date")),
        )
        .step(
            CaseStep::once("malformed end", malformed)
                .with_overrides(RequestOverrides::new().query("endDate", "31-01-2025")),
        ))
}

/// TC007: history data for a 30-day window and `groupBy` validation.
pub(crate) fn history_case(ctx: &CatalogContext) -> Result<SmokeCase, ContractError> {
    let (start, end) = ctx.history_window();
    let window = Contract::builder("metrics.history", HttpMethod::Get, HISTORY_PATH)
        .bearer()
        .query("startDate", start)
        .query("endDate", end)
        .query("groupBy", "day")
        .expect(StatusSet::of(&[200, 401])?)
        .expect_body(BodyExpectation::ByStatus {
            cases: vec![
                (
                    shapes::ok()?,
                    BodyRule::all_of(vec![
                        BodyRule::IsObject,
                        BodyRule::has_field("success"),
                        BodyRule::field_is_array("data"),
                    ]),
                ),
                (
                    StatusSet::of(&[401])?,
                    BodyRule::field_equals("error.code", json!("INVALID_TOKEN")),
                ),
            ],
        })
        .build()?;
    let window_overrides = match &ctx.bearer_token {
        Some(_) => RequestOverrides::new(),
        None => RequestOverrides::new().bearer(PLACEHOLDER_TOKEN),
    };

    let grouped = Contract::builder("metrics.history.grouped", HttpMethod::Get, HISTORY_PATH)
        .bearer()
        .expect(shapes::ok()?)
        .expect_json(BodyRule::any_of(vec![BodyRule::IsObject, BodyRule::IsArray]))
        .build()?;
    let ungroupable =
        Contract::builder("metrics.history.invalid_group", HttpMethod::Get, HISTORY_PATH)
            .bearer()
            .query("groupBy", "year")
            .expect(shapes::rejected()?)
            .expect_json(shapes::error_or_message())
            .build()?;

    let mut case = SmokeCase::new("TC007", "Metrics history")
        .step(CaseStep::once("trailing 30 days", window).with_overrides(window_overrides));
    for group in GROUP_BY_VALUES {
        case = case.step(
            CaseStep::once(format!("group by {group}"), grouped.clone())
                .with_overrides(RequestOverrides::new().query("groupBy", group)),
        );
    }
    Ok(case.step(CaseStep::once("group by year", ungroupable)))
}

/// TC008: ROAS/ROI analysis requires a well-formed date range.
pub(crate) fn analysis_case() -> Result<SmokeCase, ContractError> {
    let report = Contract::builder("roas_roi.analysis", HttpMethod::Get, ANALYSIS_PATH)
        .bearer()
        .query("startDate", "2024-01-01")
        .query("endDate", "2024-01-31")
        .expect(shapes::ok()?)
        .expect_json(BodyRule::all_of(vec![
            BodyRule::IsObject,
            BodyRule::has_any_field(&["report", "analysis"]),
        ]))
        .build()?;
    let invalid = Contract::builder("roas_roi.analysis.invalid", HttpMethod::Get, ANALYSIS_PATH)
        .bearer()
        .query("startDate", "2024-01-01")
        .query("endDate", "2024-01-31")
        .expect(shapes::rejected()?)
        .build()?;

    let variants = [
        ("missing start", RequestOverrides::new().without_query("startDate")),
        ("missing end", RequestOverrides::new().without_query("endDate")),
        ("malformed start", RequestOverrides::new().query("startDate", "invalid-date")),
        ("malformed end", RequestOverrides::new().query("endDate", "invalid-date")),
    ];
    let mut case =
        SmokeCase::new("TC008", "ROAS/ROI analysis").step(CaseStep::once("valid range", report));
    for (label, overrides) in variants {
        case = case.step(CaseStep::once(label, invalid.clone()).with_overrides(overrides));
    }
    Ok(case)
}

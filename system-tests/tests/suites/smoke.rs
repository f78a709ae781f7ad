// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Live Smoke Tests
// Description: One system test per catalog case.
// Purpose: Verify a deployed backend honours every endpoint contract.
// Dependencies: system-tests helpers
// ============================================================================

//! Live smoke tests for the marketing backend.

use std::error::Error;

use helpers::harness::check_live_case;

use crate::helpers;

#[test]
fn tc001_user_login() -> Result<(), Box<dyn Error>> {
    check_live_case("tc001_user_login", "TC001")
}

#[test]
fn tc002_user_registration() -> Result<(), Box<dyn Error>> {
    check_live_case("tc002_user_registration", "TC002")
}

#[test]
fn tc003_utm_link_creation() -> Result<(), Box<dyn Error>> {
    check_live_case("tc003_utm_link_creation", "TC003")
}

#[test]
fn tc004_google_ads_oauth() -> Result<(), Box<dyn Error>> {
    check_live_case("tc004_google_ads_oauth", "TC004")
}

#[test]
fn tc005_google_ads_campaigns() -> Result<(), Box<dyn Error>> {
    check_live_case("tc005_google_ads_campaigns", "TC005")
}

#[test]
fn tc006_dashboard_metrics() -> Result<(), Box<dyn Error>> {
    check_live_case("tc006_dashboard_metrics", "TC006")
}

#[test]
fn tc007_metrics_history() -> Result<(), Box<dyn Error>> {
    check_live_case("tc007_metrics_history", "TC007")
}

#[test]
fn tc008_roas_roi_analysis() -> Result<(), Box<dyn Error>> {
    check_live_case("tc008_roas_roi_analysis", "TC008")
}

#[test]
fn tc009_billing_subscription() -> Result<(), Box<dyn Error>> {
    check_live_case("tc009_billing_subscription", "TC009")
}

#[test]
fn tc010_whatsapp_send() -> Result<(), Box<dyn Error>> {
    check_live_case("tc010_whatsapp_send", "TC010")
}

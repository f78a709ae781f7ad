// crates/api-smoke-catalog/src/account.rs
// ============================================================================
// Module: Account Cases
// Description: Billing subscription and WhatsApp messaging checks.
// Purpose: Verify subscription reads stay fast and message sends validate input.
// Dependencies: api-smoke-core, serde_json
// ============================================================================

//! ## Overview
//! TC009 reads the subscription once, then five more times under a 2 second
//! average-latency ceiling. TC010 sends a message and rejects missing or
//! empty recipients and bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use api_smoke_core::BodyRule;
use api_smoke_core::CaseStep;
use api_smoke_core::Contract;
use api_smoke_core::ContractError;
use api_smoke_core::HttpMethod;
use api_smoke_core::LatencyProbe;
use api_smoke_core::RequestOverrides;
use api_smoke_core::SmokeCase;
use serde_json::json;

use crate::shapes;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Subscription route.
pub const SUBSCRIPTION_PATH: &str = "/api/v1/billing/subscription";
/// WhatsApp send route.
pub const WHATSAPP_PATH: &str = "/api/v1/whatsapp/send";
/// Sequential subscription reads in the latency step.
pub const SUBSCRIPTION_REPEATS: u32 = 5;
/// Average latency ceiling for the repeated reads.
pub const SUBSCRIPTION_CEILING: Duration = Duration::from_secs(2);

// ============================================================================
// SECTION: Cases
// ============================================================================

/// TC009: subscription details, then a repeated-read latency gate.
pub(crate) fn subscription_case() -> Result<SmokeCase, ContractError> {
    let subscription = Contract::builder("billing.subscription", HttpMethod::Get, SUBSCRIPTION_PATH)
        .bearer()
        .expect(shapes::ok()?)
        .expect_json(BodyRule::all_of(vec![
            BodyRule::has_field("plan"),
            BodyRule::has_field("status"),
        ]))
        .build()?;
    let probe = LatencyProbe::new(SUBSCRIPTION_REPEATS, SUBSCRIPTION_CEILING)?;
    Ok(SmokeCase::new("TC009", "Billing subscription")
        .step(CaseStep::once("current plan", subscription.clone()))
        .step(CaseStep::repeated("repeated reads", subscription, probe)))
}

/// TC010: message sending accepts valid input and rejects missing or empty fields.
pub(crate) fn whatsapp_case() -> Result<SmokeCase, ContractError> {
    let body = json!({
        "to": "+12345678901",
        "message": "Test message from automated test.",
    });
    let send = Contract::builder("whatsapp.send", HttpMethod::Post, WHATSAPP_PATH)
        .bearer()
        .body(body.clone())
        .expect(shapes::ok()?)
        .expect_json(BodyRule::any_of(vec![
            BodyRule::field_equals("success", json!(true)),
            BodyRule::has_field("messageId"),
        ]))
        .build()?;
    let invalid = Contract::builder("whatsapp.send.invalid", HttpMethod::Post, WHATSAPP_PATH)
        .bearer()
        .body(body)
        .expect(shapes::rejected()?)
        .build()?;

    let variants = [
        ("missing recipient", RequestOverrides::new().without_field("to")),
        ("missing message", RequestOverrides::new().without_field("message")),
        ("empty recipient", RequestOverrides::new().field("to", json!(""))),
        ("empty message", RequestOverrides::new().field("message", json!(""))),
    ];
    let mut case = SmokeCase::new("TC010", "WhatsApp message sending")
        .step(CaseStep::once("valid message", send));
    for (label, overrides) in variants {
        case = case.step(CaseStep::once(label, invalid.clone()).with_overrides(overrides));
    }
    Ok(case)
}

// crates/api-smoke-catalog/src/marketing.rs
// ============================================================================
// Module: Marketing Cases
// Description: UTM link creation and Google Ads integration checks.
// Purpose: Verify link building, OAuth initiation, and campaign listing.
// Dependencies: api-smoke-core, serde_json
// ============================================================================

//! ## Overview
//! TC003 creates UTM links and checks every `utm_<field>=<value>` pair lands
//! in the returned link. TC004 starts the Google Ads OAuth flow. TC005 lists
//! campaigns for a customer id.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_smoke_core::BodyRule;
use api_smoke_core::CaseStep;
use api_smoke_core::Contract;
use api_smoke_core::ContractError;
use api_smoke_core::HttpMethod;
use api_smoke_core::RequestOverrides;
use api_smoke_core::SmokeCase;
use api_smoke_core::StatusSet;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::shapes;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// UTM creation route.
pub const UTM_PATH: &str = "/api/v1/utm/create";
/// OAuth initiation route.
pub const GOOGLE_ADS_AUTH_PATH: &str = "/api/v1/google-ads/auth";
/// Campaign listing route.
pub const CAMPAIGNS_PATH: &str = "/api/v1/google-ads/campaigns";
/// Destination URL used for every UTM link.
pub const ORIGINAL_URL: &str = "https://www.example.com";
/// Body field and query parameter name for each UTM value sent.
pub const UTM_PARAMETERS: [(&str, &str, &str); 5] = [
    ("utmSource", "utm_source", "newsletter"),
    ("utmMedium", "utm_medium", "email"),
    ("utmCampaign", "utm_campaign", "launch"),
    ("utmTerm", "utm_term", "testterm"),
    ("utmContent", "utm_content", "contentA"),
];
/// Fields that may carry the created link, in priority order.
const LINK_FIELDS: [&str; 3] = ["utmLink", "shortUrl", "url"];

// ============================================================================
// SECTION: Cases
// ============================================================================

/// TC003: UTM links carry the destination and every UTM parameter.
pub(crate) fn utm_case() -> Result<SmokeCase, ContractError> {
    let minimal = Contract::builder("utm.create", HttpMethod::Post, UTM_PATH)
        .body(json!({"originalUrl": ORIGINAL_URL}))
        .expect(shapes::created()?)
        .expect_json(BodyRule::link_contains(&LINK_FIELDS, vec![ORIGINAL_URL.to_string()], false))
        .build()?;

    let mut full_body = Map::new();
    full_body.insert("originalUrl".to_string(), Value::String(ORIGINAL_URL.to_string()));
    for (field, _, value) in UTM_PARAMETERS {
        full_body.insert(field.to_string(), Value::String(value.to_string()));
    }
    let needles =
        UTM_PARAMETERS.iter().map(|(_, param, value)| format!("{param}={value}")).collect();
    let full = Contract::builder("utm.create.tagged", HttpMethod::Post, UTM_PATH)
        .body(Value::Object(full_body))
        .expect(shapes::created()?)
        .expect_json(BodyRule::link_contains(&LINK_FIELDS, needles, true))
        .build()?;

    let invalid = Contract::builder("utm.create.invalid", HttpMethod::Post, UTM_PATH)
        .body(json!({"originalUrl": "htp://bad-url"}))
        .expect(shapes::any_error()?)
        .expect_json(BodyRule::has_any_field(&["error", "message", "detail", "errors"]))
        .build()?;

    Ok(SmokeCase::new("TC003", "UTM link creation")
        .step(CaseStep::once("destination only", minimal))
        .step(CaseStep::once("every utm parameter", full))
        .step(CaseStep::once("malformed destination", invalid.clone()))
        .step(
            CaseStep::once("missing destination", invalid)
                .with_overrides(RequestOverrides::new().body(json!({"utmSource": "newsletter"}))),
        ))
}

/// TC004: OAuth initiation returns an auth URL and validates `redirect_uri`.
pub(crate) fn google_ads_auth_case() -> Result<SmokeCase, ContractError> {
    let start = Contract::builder("google_ads.auth", HttpMethod::Post, GOOGLE_ADS_AUTH_PATH)
        .body(json!({"redirect_uri": "https://example.com/oauth/callback"}))
        .expect(shapes::created()?)
        .expect_json(BodyRule::all_of(vec![
            BodyRule::IsObject,
            BodyRule::has_any_field(&["auth_url", "authUrl", "url"]),
        ]))
        .build()?;
    let rejected =
        Contract::builder("google_ads.auth.rejected", HttpMethod::Post, GOOGLE_ADS_AUTH_PATH)
            .body(json!({"redirect_uri": "not-a-valid-url"}))
            .expect(shapes::rejected()?)
            .expect_json(shapes::error_or_message())
            .build()?;

    Ok(SmokeCase::new("TC004", "Google Ads OAuth initiation")
        .step(CaseStep::once("valid redirect", start))
        .step(
            CaseStep::once("missing redirect", rejected.clone())
                .with_overrides(RequestOverrides::new().without_field("redirect_uri")),
        )
        .step(CaseStep::once("malformed redirect", rejected)))
}

/// TC005: campaigns are listed for a valid customer and errors are described.
pub(crate) fn campaigns_case() -> Result<SmokeCase, ContractError> {
    let list = Contract::builder("google_ads.campaigns", HttpMethod::Get, CAMPAIGNS_PATH)
        .query("customer_id", "1234567890")
        .expect(shapes::ok()?)
        .expect_json(BodyRule::all_of(vec![
            BodyRule::IsObject,
            BodyRule::field_is_array("campaigns"),
        ]))
        .build()?;
    let missing = Contract::builder("google_ads.campaigns.missing", HttpMethod::Get, CAMPAIGNS_PATH)
        .expect(shapes::rejected()?)
        .expect_json(shapes::error_or_message())
        .build()?;
    let unknown = Contract::builder("google_ads.campaigns.invalid", HttpMethod::Get, CAMPAIGNS_PATH)
        .query("customer_id", "invalid_id_!@#")
        .expect(StatusSet::of(&[400, 404])?)
        .expect_json(shapes::error_or_message())
        .build()?;

    Ok(SmokeCase::new("TC005", "Google Ads campaigns")
        .step(CaseStep::once("valid customer", list))
        .step(CaseStep::once("missing customer", missing))
        .step(CaseStep::once("invalid customer", unknown)))
}

// crates/api-smoke-catalog/src/auth.rs
// ============================================================================
// Module: Authentication Cases
// Description: Login and registration checks.
// Purpose: Verify credential handling and registration validation.
// Dependencies: api-smoke-core, serde_json
// ============================================================================

//! ## Overview
//! TC001 signs in with the configured pair and with an unknown pair. TC002
//! registers a fresh account, then omits each required field and sends a
//! malformed email and a short password; every rejection must name the field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_smoke_core::BodyRule;
use api_smoke_core::CaseStep;
use api_smoke_core::Contract;
use api_smoke_core::ContractError;
use api_smoke_core::Credentials;
use api_smoke_core::HttpMethod;
use api_smoke_core::RequestOverrides;
use api_smoke_core::SmokeCase;
use api_smoke_core::StatusSet;
use serde_json::Value;
use serde_json::json;

use crate::context::CatalogContext;
use crate::shapes;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Login route.
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
/// Registration route.
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
/// Registration fields the backend must require.
pub const REGISTRATION_FIELDS: [&str; 4] = ["name", "email", "password", "organizationName"];

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Login with the given pair must return a token.
///
/// # Errors
///
/// Returns [`ContractError`] if the contract is malformed.
pub fn login_contract(credentials: &Credentials) -> Result<Contract, ContractError> {
    Contract::builder("auth.login", HttpMethod::Post, LOGIN_PATH)
        .body(json!({
            "email": credentials.email,
            "password": credentials.password,
        }))
        .expect(shapes::ok()?)
        .expect_json(BodyRule::has_any_field(&["token", "accessToken"]))
        .build()
}

/// TC001: login accepts a valid pair and rejects an unknown one.
pub(crate) fn login_case(ctx: &CatalogContext) -> Result<SmokeCase, ContractError> {
    let rejected = Contract::builder("auth.login.rejected", HttpMethod::Post, LOGIN_PATH)
        .body(json!({
            "email": "invaliduser@example.com",
            "password": "WrongPassword",
        }))
        .expect(StatusSet::of(&[400, 401])?)
        .expect_json(shapes::error_or_message())
        .build()?;
    Ok(SmokeCase::new("TC001", "User login")
        .step(CaseStep::once("valid credentials", login_contract(&ctx.credentials)?))
        .step(CaseStep::once("unknown credentials", rejected)))
}

/// TC002: registration succeeds once and names every invalid field.
pub(crate) fn registration_case(ctx: &CatalogContext) -> Result<SmokeCase, ContractError> {
    let email = ctx.registration_email();
    let payload = json!({
        "name": "Test User",
        "email": email,
        "password": "StrongP@ssw0rd!",
        "organizationName": "Test Organization",
    });
    let register = Contract::builder("auth.register", HttpMethod::Post, REGISTER_PATH)
        .body(payload.clone())
        .expect(shapes::created()?)
        .expect_json(BodyRule::field_equals("email", Value::String(email)))
        .build()?;

    let mut case = SmokeCase::new("TC002", "User registration")
        .step(CaseStep::once("fresh account", register));
    for field in REGISTRATION_FIELDS {
        case = case.step(
            CaseStep::once(format!("missing {field}"), rejection(&payload, field)?)
                .with_overrides(RequestOverrides::new().without_field(field)),
        );
    }
    Ok(case
        .step(
            CaseStep::once("malformed email", rejection(&payload, "email")?).with_overrides(
                RequestOverrides::new().field("email", json!("invalid-email-format")),
            ),
        )
        .step(
            CaseStep::once("short password", rejection(&payload, "password")?)
                .with_overrides(RequestOverrides::new().field("password", json!("123"))),
        ))
}

/// Registration rejected with a message naming `field`.
fn rejection(payload: &Value, field: &str) -> Result<Contract, ContractError> {
    Contract::builder(format!("auth.register.invalid_{field}"), HttpMethod::Post, REGISTER_PATH)
        .body(payload.clone())
        .expect(shapes::rejected()?)
        .expect_json(BodyRule::field_mentions("message", field))
        .build()
}

// crates/api-smoke-core/src/lib.rs
// ============================================================================
// Module: API Smoke Core Library
// Description: Contract model and check runner for black-box HTTP smoke tests.
// Purpose: Send one request per contract, judge the response, report clearly.
// Dependencies: reqwest, serde, serde_json, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! A [`Contract`] declares one endpoint call and the response shape it must
//! produce. The [`ContractRunner`] issues the call with a bounded timeout and
//! judges the response into a [`CheckOutcome`]. Cases group checks into
//! fail-fast sequences and suites aggregate cases into reports.
//!
//! Execution is strictly sequential and blocking. Nothing is retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod contract;
pub mod latency;
pub mod outcome;
pub mod overrides;
pub mod report;
pub mod rules;
pub mod runner;
pub mod suite;


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::ConfigError;
pub use config::Credentials;
pub use config::SmokeConfig;
pub use config::SmokeEnv;
pub use contract::AuthRequirement;
pub use contract::BodyExpectation;
pub use contract::Contract;
pub use contract::ContractBuilder;
pub use contract::ContractError;
pub use contract::HttpMethod;
pub use contract::StatusSet;
pub use latency::LatencyFailure;
pub use latency::LatencyProbe;
pub use latency::LatencyReport;
pub use outcome::CheckFailure;
pub use outcome::CheckOutcome;
pub use outcome::FailureKind;
pub use overrides::RequestOverrides;
pub use report::CaseReport;
pub use report::StepReport;
pub use report::StepStatus;
pub use report::SuiteReport;
pub use rules::BodyRule;
pub use rules::Violation;
pub use runner::ContractRunner;
pub use runner::Invocation;
pub use runner::ResponseBody;
pub use runner::RunnerError;
pub use runner::judge;
pub use suite::CaseSetup;
pub use suite::CaseStep;
pub use suite::SmokeCase;
pub use suite::StepMode;
pub use suite::SuiteRunner;

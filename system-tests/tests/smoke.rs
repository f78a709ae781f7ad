// system-tests/tests/smoke.rs
// ============================================================================
// Module: Smoke Suite
// Description: Aggregates live-backend smoke tests into one binary.
// Purpose: Run every catalog case against a real deployment.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates live-backend smoke tests into one binary. The backend location
//! and credentials come from `API_SMOKE_*`; artifacts land under
//! `target/system-tests` unless `API_SMOKE_SYSTEM_TEST_RUN_ROOT` is set.

mod helpers;

#[path = "suites/smoke.rs"]
mod smoke;

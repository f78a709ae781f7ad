// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for API smoke system-tests.
// Purpose: Provide the live-case harness and artifact utilities.
// Dependencies: system-tests, api-smoke-core, api-smoke-catalog
// ============================================================================

//! ## Overview
//! Shared helpers for API smoke system-tests.

pub mod artifacts;
pub mod harness;

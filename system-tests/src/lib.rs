// system-tests/src/lib.rs
// ============================================================================
// Module: API Smoke System Tests Library
// Description: Shared configuration for live-backend system tests.
// Purpose: Provide common settings for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts configuration shared by the live-backend suites in
//! `system-tests/tests`. The suites only build with the `system-tests`
//! feature and expect a reachable backend configured through `API_SMOKE_*`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// crates/api-smoke-catalog/src/shapes.rs
// ============================================================================
// Module: Shared Response Shapes
// Description: Status sets and body rules reused across cases.
// Purpose: Keep recurring expectations identical between endpoints.
// Dependencies: api-smoke-core
// ============================================================================

//! Recurring status sets and body rules.

use api_smoke_core::BodyRule;
use api_smoke_core::ContractError;
use api_smoke_core::StatusSet;

/// `200`.
pub(crate) fn ok() -> Result<StatusSet, ContractError> {
    StatusSet::of(&[200])
}

/// `200` or `201`.
pub(crate) fn created() -> Result<StatusSet, ContractError> {
    StatusSet::of(&[200, 201])
}

/// `400` or `422`.
pub(crate) fn rejected() -> Result<StatusSet, ContractError> {
    StatusSet::of(&[400, 422])
}

/// Any status from `400` up.
pub(crate) fn any_error() -> Result<StatusSet, ContractError> {
    StatusSet::at_least(400)
}

/// Error body carrying `error` or `message`.
pub(crate) fn error_or_message() -> BodyRule {
    BodyRule::has_any_field(&["error", "message"])
}

// crates/api-smoke-catalog/src/lib.rs
// ============================================================================
// Module: API Smoke Catalog
// Description: The ten marketing-backend smoke cases.
// Purpose: Declare every endpoint contract once, in execution order.
// Dependencies: api-smoke-core, serde_json, time, uuid
// ============================================================================

//! ## Overview
//! [`cases`] builds TC001 through TC010 from a [`CatalogContext`]. Cases are
//! plain data; running them is the job of `api_smoke_core::SuiteRunner`.
//!
//! | Id | Route |
//! |---|---|
//! | TC001 | `POST /api/v1/auth/login` |
//! | TC002 | `POST /api/v1/auth/register` |
//! | TC003 | `POST /api/v1/utm/create` |
//! | TC004 | `POST /api/v1/google-ads/auth` |
//! | TC005 | `GET /api/v1/google-ads/campaigns` |
//! | TC006 | `GET /api/v1/metrics/dashboard` |
//! | TC007 | `GET /api/v1/metrics/history` |
//! | TC008 | `GET /api/v1/roas-roi/analysis` |
//! | TC009 | `GET /api/v1/billing/subscription` |
//! | TC010 | `POST /api/v1/whatsapp/send` |

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod account;
pub mod auth;
pub mod context;
pub mod marketing;
pub mod metrics;
mod shapes;


// ============================================================================
// SECTION: Imports
// ============================================================================

use api_smoke_core::ContractError;
use api_smoke_core::SmokeCase;

pub use crate::context::CatalogContext;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Builds every case in execution order.
///
/// # Errors
///
/// Returns [`ContractError`] if a contract declaration is malformed.
pub fn cases(ctx: &CatalogContext) -> Result<Vec<SmokeCase>, ContractError> {
    Ok(vec![
        auth::login_case(ctx)?,
        auth::registration_case(ctx)?,
        marketing::utm_case()?,
        marketing::google_ads_auth_case()?,
        marketing::campaigns_case()?,
        metrics::dashboard_case(ctx)?,
        metrics::history_case(ctx)?,
        metrics::analysis_case()?,
        account::subscription_case()?,
        account::whatsapp_case()?,
    ])
}

/// Selects cases by id, preserving catalog order.
///
/// # Errors
///
/// Returns the first requested id that names no case.
pub fn select(all: Vec<SmokeCase>, ids: &[String]) -> Result<Vec<SmokeCase>, String> {
    if ids.is_empty() {
        return Ok(all);
    }
    if let Some(unknown) =
        ids.iter().find(|id| !all.iter().any(|case| case.id.eq_ignore_ascii_case(id)))
    {
        return Err(unknown.clone());
    }
    Ok(all
        .into_iter()
        .filter(|case| ids.iter().any(|id| case.id.eq_ignore_ascii_case(id)))
        .collect())
}

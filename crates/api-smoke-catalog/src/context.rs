// crates/api-smoke-catalog/src/context.rs
// ============================================================================
// Module: Catalog Context
// Description: Per-run inputs the case catalog is built from.
// Purpose: Keep credentials, dates, and unique values out of case definitions.
// Dependencies: api-smoke-core, time, uuid
// ============================================================================

//! ## Overview
//! A [`CatalogContext`] carries everything that varies between runs: the login
//! pair, an optional bearer token, today's date for date windows, and a unique
//! run token used to mint fresh registration emails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_smoke_core::Credentials;
use api_smoke_core::SmokeConfig;
use time::Date;
use time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of the metrics history window in days.
pub const HISTORY_WINDOW_DAYS: i64 = 30;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Per-run catalog inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogContext {
    /// Login pair for login checks and case setup.
    pub credentials: Credentials,
    /// Configured bearer token, if any.
    pub bearer_token: Option<String>,
    /// Current date, used to anchor date windows.
    pub today: Date,
    /// Unique token for this run.
    pub run_token: String,
}

impl CatalogContext {
    /// Context for a live run: today's UTC date and a random run token.
    #[must_use]
    pub fn from_config(config: &SmokeConfig) -> Self {
        Self {
            credentials: config.credentials.clone(),
            bearer_token: config.bearer_token.clone(),
            today: OffsetDateTime::now_utc().date(),
            run_token: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Deterministic context.
    #[must_use]
    pub fn fixed(credentials: Credentials, today: Date, run_token: impl Into<String>) -> Self {
        Self {
            credentials,
            bearer_token: None,
            today,
            run_token: run_token.into(),
        }
    }

    /// Email that has never been registered before.
    #[must_use]
    pub fn registration_email(&self) -> String {
        format!("user_{}@example.com", self.run_token)
    }

    /// Start and end dates of the trailing history window, formatted `YYYY-MM-DD`.
    #[must_use]
    pub fn history_window(&self) -> (String, String) {
        let start =
            self.today.checked_sub(Duration::days(HISTORY_WINDOW_DAYS)).unwrap_or(self.today);
        (iso_date(start), iso_date(self.today))
    }
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn iso_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

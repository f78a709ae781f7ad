// crates/api-smoke-core/src/overrides.rs
// ============================================================================
// Module: Request Overrides
// Description: Concrete per-call values layered over a contract's defaults.
// Purpose: Let one contract drive valid, missing-field, and malformed calls.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Overrides supply the concrete values for one call: a specific invalid
//! email, an omitted required field, a bearer token. Query and body edits are
//! applied on top of the contract defaults; `None` entries remove a key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Per-call request values.
///
/// # Invariants
/// - `body` replaces the contract body before field edits are applied.
/// - Field edits on a non-object body are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOverrides {
    /// Query edits; `None` removes the key.
    pub query: BTreeMap<String, Option<String>>,
    /// Top-level body field edits; `None` removes the field.
    pub body_fields: BTreeMap<String, Option<Value>>,
    /// Whole-body replacement.
    pub body: Option<Value>,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// Values for `{name}` path placeholders.
    pub path_params: BTreeMap<String, String>,
    /// Bearer token taking precedence over the runner default.
    pub bearer_token: Option<String>,
}

impl RequestOverrides {
    /// Returns an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), Some(value.into()));
        self
    }

    /// Removes a default query parameter.
    #[must_use]
    pub fn without_query(mut self, key: impl Into<String>) -> Self {
        self.query.insert(key.into(), None);
        self
    }

    /// Sets a top-level body field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body_fields.insert(key.into(), Some(value));
        self
    }

    /// Removes a top-level body field.
    #[must_use]
    pub fn without_field(mut self, key: impl Into<String>) -> Self {
        self.body_fields.insert(key.into(), None);
        self
    }

    /// Replaces the whole body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Supplies a path placeholder value.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Sets the bearer token for this call.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Merges query edits into the contract defaults.
    #[must_use]
    pub fn apply_query(&self, defaults: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut merged = defaults.clone();
        for (key, value) in &self.query {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged
    }

    /// Merges body edits into the contract default body.
    #[must_use]
    pub fn apply_body(&self, default: Option<&Value>) -> Option<Value> {
        let mut body = self.body.clone().or_else(|| default.cloned());
        if self.body_fields.is_empty() {
            return body;
        }
        let target = body.get_or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = target {
            for (key, value) in &self.body_fields {
                match value {
                    Some(value) => {
                        map.insert(key.clone(), value.clone());
                    }
                    None => {
                        map.remove(key);
                    }
                }
            }
        }
        body
    }
}

// crates/api-smoke-core/src/config/env_tests.rs
// ============================================================================
// Module: Smoke Env Unit Tests
// Description: Unit coverage for strict environment parsing.
// Purpose: Ensure env overrides apply and fail closed on invalid inputs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Unit coverage for strict environment parsing.
//! Invariants:
//! - Environment parsing rejects invalid or empty values.
//! - Tests restore environment state after each run.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::use_debug,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

use super::ConfigError;
use super::SmokeConfig;
use super::SmokeEnv;

mod env_mut {
    #![allow(unsafe_code, reason = "Tests mutate process env vars in a controlled scope.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("env lock poisoned")
}

/// Snapshots smoke variables, clears them, and restores them on drop.
struct EnvGuard {
    entries: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn cleared() -> Self {
        let entries = SmokeEnv::ALL
            .iter()
            .map(|key| (key.as_str(), std::env::var(key.as_str()).ok()))
            .collect();
        for key in SmokeEnv::ALL {
            env_mut::remove_var(key.as_str());
        }
        Self {
            entries,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.entries.drain(..) {
            match value {
                Some(value) => env_mut::set_var(name, &value),
                None => env_mut::remove_var(name),
            }
        }
    }
}

#[test]
fn defaults_apply_without_env() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    let config = SmokeConfig::load(None).expect("config should load");
    assert_eq!(config.base_url, "http://localhost:3001");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.bearer_token, None);
    assert_eq!(config.credentials.email, "validuser@example.com");
    assert!(config.user_agent.starts_with("api-smoke/"));
}

#[test]
fn env_overrides_every_field() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    env_mut::set_var(SmokeEnv::BaseUrl.as_str(), "https://staging.example.test");
    env_mut::set_var(SmokeEnv::TimeoutSeconds.as_str(), "5");
    env_mut::set_var(SmokeEnv::BearerToken.as_str(), "tok-123");
    env_mut::set_var(SmokeEnv::LoginEmail.as_str(), "qa@example.test");
    env_mut::set_var(SmokeEnv::LoginPassword.as_str(), "s3cret!");

    let config = SmokeConfig::load(None).expect("config should load");
    assert_eq!(config.base_url, "https://staging.example.test");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.bearer_token.as_deref(), Some("tok-123"));
    assert_eq!(config.credentials.email, "qa@example.test");
    assert_eq!(config.credentials.password, "s3cret!");
}

#[test]
fn timeout_rejects_invalid_values() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    for raw in ["0", "not-a-number", "-3"] {
        env_mut::set_var(SmokeEnv::TimeoutSeconds.as_str(), raw);
        assert!(matches!(SmokeConfig::load(None), Err(ConfigError::Env(_))), "accepted {raw}");
    }
}

#[test]
fn empty_values_fail_closed() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    env_mut::set_var(SmokeEnv::BearerToken.as_str(), "   ");
    assert!(matches!(SmokeConfig::load(None), Err(ConfigError::Env(_))));
}

#[test]
fn env_base_url_is_validated() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    env_mut::set_var(SmokeEnv::BaseUrl.as_str(), "ftp://example.test");
    assert!(matches!(SmokeConfig::load(None), Err(ConfigError::Invalid(_))));
}

#[test]
fn debug_output_redacts_secrets() {
    let config = SmokeConfig {
        bearer_token: Some("very-secret-token".to_string()),
        ..SmokeConfig::default()
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("very-secret-token"));
    assert!(!rendered.contains("ValidPassword123"));
    assert!(rendered.contains("<redacted>"));
}

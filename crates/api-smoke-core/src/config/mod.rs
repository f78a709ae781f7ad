// crates/api-smoke-core/src/config/mod.rs
// ============================================================================
// Module: Smoke Configuration
// Description: Typed configuration for the smoke runner.
// Purpose: Resolve defaults, an optional TOML file, and env overrides.
// Dependencies: reqwest, serde, toml
// ============================================================================

//! ## Overview
//! [`SmokeConfig`] resolves in order: built-in defaults, an optional TOML file,
//! then `API_SMOKE_*` environment variables. Callers layer command-line flags
//! on top and call [`SmokeConfig::validate`] again.
//!
//! Invariants:
//! - Config files larger than 1 MiB or with unknown keys are rejected.
//! - Secrets never appear in `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

mod env;

pub use env::SmokeEnv;
pub use env::read_env_strict;

use self::env::EnvOverrides;

#[cfg(test)]
mod env_tests;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Maximum allowed config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default login email.
pub const DEFAULT_LOGIN_EMAIL: &str = "validuser@example.com";
/// Default login password.
pub const DEFAULT_LOGIN_PASSWORD: &str = "ValidPassword123";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Environment value failed strict parsing.
    #[error("config env error: {0}")]
    Env(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Login pair used by login checks and case setup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: DEFAULT_LOGIN_EMAIL.to_string(),
            password: DEFAULT_LOGIN_PASSWORD.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolved runner configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct SmokeConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Token for protected routes when no case setup supplies one.
    pub bearer_token: Option<String>,
    /// Login pair.
    pub credentials: Credentials,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bearer_token: None,
            credentials: Credentials::default(),
            user_agent: format!("api-smoke/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for SmokeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmokeConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("credentials", &self.credentials)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl SmokeConfig {
    /// Loads configuration from defaults, an optional file, and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an env
    /// value is invalid, or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized, not
    /// UTF-8, or not valid configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses TOML text layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse failure, unknown keys, or a zero timeout.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: SmokeConfigFile =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let mut config = Self::default();
        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(secs) = file.timeout_sec {
            if secs == 0 {
                return Err(ConfigError::Invalid(
                    "timeout_sec must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if file.bearer_token.is_some() {
            config.bearer_token = file.bearer_token;
        }
        if let Some(user_agent) = file.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(credentials) = file.credentials {
            if let Some(email) = credentials.email {
                config.credentials.email = email;
            }
            if let Some(password) = credentials.password {
                config.credentials.password = password;
            }
        }
        Ok(config)
    }

    /// Applies `API_SMOKE_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a set variable is not valid UTF-8, is
    /// blank, or fails parsing.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        let overrides = EnvOverrides::load().map_err(ConfigError::Env)?;
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if overrides.bearer_token.is_some() {
            self.bearer_token = overrides.bearer_token;
        }
        if let Some(email) = overrides.login_email {
            self.credentials.email = email;
        }
        if let Some(password) = overrides.login_password {
            self.credentials.password = password;
        }
        Ok(())
    }

    /// Sets the timeout from a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `secs` is zero.
    pub fn set_timeout_secs(&mut self, secs: u64) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a field is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("base_url `{}`: {err}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url `{}` must use http or https",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        if self.bearer_token.as_deref().is_some_and(|token| token.trim().is_empty()) {
            return Err(ConfigError::Invalid("bearer_token must not be empty".to_string()));
        }
        if self.credentials.email.trim().is_empty() {
            return Err(ConfigError::Invalid("credentials.email must not be empty".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: File Format
// ============================================================================

/// On-disk configuration; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SmokeConfigFile {
    /// Backend base URL.
    base_url: Option<String>,
    /// Timeout in seconds.
    timeout_sec: Option<u64>,
    /// Bearer token.
    bearer_token: Option<String>,
    /// `User-Agent` value.
    user_agent: Option<String>,
    /// Login pair.
    credentials: Option<CredentialsFile>,
}

/// On-disk login pair.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialsFile {
    /// Account email.
    email: Option<String>,
    /// Account password.
    password: Option<String>,
}

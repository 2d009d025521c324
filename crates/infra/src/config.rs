//! Runtime configuration.
//!
//! Everything here is resolved once at process startup and then passed
//! explicitly into the resolver, catalog and router. Request handlers never
//! read the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use shopfront_auth::{KeySources, SecretRef};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CATALOG_PATH: &str = "data/products.json";
pub const DEFAULT_TEST_KEY: &str = "test-api-key";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SECRET_FIELD: &str = "api_key";
pub const DEFAULT_SECRET_ENDPOINT: &str = "http://localhost:2773";
pub const DEFAULT_SECRET_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be one of 1/0, true/false, yes/no, on/off (got '{value}')")]
    InvalidFlag { var: &'static str, value: String },

    #[error("{var} must be a positive integer (got '{value}')")]
    InvalidNumber { var: &'static str, value: String },

    #[error("failed to load .env file: {0}")]
    DotEnv(String),
}

/// Merge a local `.env` file into the process environment, if one exists.
///
/// Variables already set in the environment take precedence. Returns the
/// path that was loaded. Call this before anything reads the environment.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::DotEnv(e.to_string())),
    }
}

/// Connection settings for the secrets agent.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBackendConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl core::fmt::Debug for SecretBackendConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecretBackendConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Immutable process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub catalog_path: PathBuf,
    pub key_sources: KeySources,
    pub secret_backend: SecretBackendConfig,
}

impl AppConfig {
    /// Load from the process environment (see [`load_dotenv`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                var: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let catalog_path =
            PathBuf::from(get("CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()));

        let test_mode = match get("TEST_MODE") {
            Some(v) => parse_flag("TEST_MODE", &v)?,
            None => false,
        };

        let region = get("REGION")
            .or_else(|| get("AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let secret = get("SECRET_NAME").map(|name| SecretRef {
            name,
            region,
            field: get("SECRET_FIELD").unwrap_or_else(|| DEFAULT_SECRET_FIELD.to_string()),
        });

        let key_sources = KeySources {
            test_mode,
            test_key: get("TEST_API_KEY").unwrap_or_else(|| DEFAULT_TEST_KEY.to_string()),
            local_key: get("API_KEY"),
            secret,
        };

        let timeout_ms = match get("SECRET_TIMEOUT_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: "SECRET_TIMEOUT_MS",
                    value: v,
                })?,
            None => DEFAULT_SECRET_TIMEOUT_MS,
        };

        let secret_backend = SecretBackendConfig {
            endpoint: get("SECRET_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SECRET_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            token: get("SECRET_TOKEN").or_else(|| get("AWS_SESSION_TOKEN")),
            timeout: Duration::from_millis(timeout_ms),
        };

        Ok(Self {
            bind_addr,
            catalog_path,
            key_sources,
            secret_backend,
        })
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

//! Centralized gateway configuration loaded from environment variables.
//!
//! Configuration is read exactly once at startup into an immutable `Config`.
//! Any missing or invalid required value is an error and the process must not
//! serve traffic.

use std::env;
use std::time::Duration;

use super::backends::{BackendId, Backends};
use crate::error::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1024 * 1024;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Deployment environment, read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Test,
    Prod,
}

impl RuntimeEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("production") | Some("prod") => Self::Prod,
            Some("test") => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,
    pub log_level: String,

    // Security configuration
    pub jwt_secret: String,

    // Downstream services
    pub backends: Backends,
    /// Unset means wait for the backend indefinitely.
    pub upstream_timeout: Option<Duration>,

    // HTTP surface
    pub cors_allowed_origins: Vec<String>,
    pub max_payload_size: usize,
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        let auth_url = required(&lookup, BackendId::Auth.env_var())?;
        let goals_url = required(&lookup, BackendId::Goals.env_var())?;
        let backends = Backends::new(&auth_url, &goals_url)?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let runtime_env = RuntimeEnv::parse(lookup("NODE_ENV").as_deref());
        let log_level = lookup("LOG_LEVEL")
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| "info".to_string());

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::config(format!(
                        "UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            _ => None,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "null")
            .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
            .map(str::to_string)
            .collect();

        let max_payload_size = parse_or(&lookup, "MAX_PAYLOAD_SIZE", DEFAULT_MAX_PAYLOAD_SIZE)?;
        let shutdown_timeout_secs =
            parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", DEFAULT_SHUTDOWN_TIMEOUT_SECS)?;

        Ok(Config {
            host,
            port,
            runtime_env,
            log_level,
            jwt_secret,
            backends,
            upstream_timeout,
            cors_allowed_origins,
            max_payload_size,
            shutdown_timeout_secs,
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "Missing required environment variable: {name}"
        ))),
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!("{name} has an invalid value: '{raw}'"))
        }),
        _ => Ok(default),
    }
}

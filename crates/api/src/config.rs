use std::time::Duration;

use tableprof_core::config::{env_lookup, var_or, ConfigError};
use tableprof_upstream::UpstreamConfig;

use crate::fetch::RetryPolicy;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// SQLite connection string (default: `sqlite://tableprof.db`).
    pub database_url: String,
    /// Upstream profiling service settings.
    pub upstream: UpstreamConfig,
    /// Retry policy for transient upstream failures.
    pub retry: RetryPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `HOST`                           | `0.0.0.0`               |
    /// | `PORT`                           | `8000`                  |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                    |
    /// | `DATABASE_URL`                   | `sqlite://tableprof.db` |
    /// | `PROFILING_API_MAX_ATTEMPTS`     | `1`                     |
    /// | `PROFILING_API_RETRY_BACKOFF_MS` | `500`                   |
    ///
    /// Upstream variables are documented on [`UpstreamConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: String = var_or(lookup, "HOST", "0.0.0.0".into())?;
        let port: u16 = var_or(lookup, "PORT", 8000)?;

        let cors_raw: String = var_or(lookup, "CORS_ORIGINS", "http://localhost:5173".into())?;
        let cors_origins: Vec<String> = cors_raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var_or(lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let database_url: String = var_or(lookup, "DATABASE_URL", "sqlite://tableprof.db".into())?;

        let max_attempts: u32 = var_or(lookup, "PROFILING_API_MAX_ATTEMPTS", 1)?;
        let backoff_ms: u64 = var_or(lookup, "PROFILING_API_RETRY_BACKOFF_MS", 500)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            upstream: UpstreamConfig::from_lookup(lookup)?,
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
        })
    }
}

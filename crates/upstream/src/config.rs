use std::time::Duration;

use tableprof_core::config::{env_lookup, var_or, ConfigError};

/// Connection settings for the upstream profiling service.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Full profiling endpoint; the triple is appended as query parameters.
    pub base_url: String,
    /// Bound on a single request, connect through body (default: 5s).
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                              |
    /// |------------------------------|--------------------------------------|
    /// | `PROFILING_API_URL`          | `{BFF_BASE_URL}/api/profiling`       |
    /// | `BFF_BASE_URL`               | `https://api.example.com`            |
    /// | `PROFILING_API_TIMEOUT_SECS` | `5`                                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup("PROFILING_API_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url.trim().to_string(),
            None => {
                let bff: String = var_or(lookup, "BFF_BASE_URL", "https://api.example.com".into())?;
                format!("{}/api/profiling", bff.trim_end_matches('/'))
            }
        };

        let timeout_secs: u64 = var_or(lookup, "PROFILING_API_TIMEOUT_SECS", 5)?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

//! Profiling service client.
//!
//! One `GET <base_url>?source_key=..&schema_name=..&table_name=..` per call.
//! Failures are mapped onto the shared [`CoreError`] taxonomy; retries are
//! the caller's responsibility.

use std::error::Error as _;

use async_trait::async_trait;
use reqwest::Url;
use tableprof_core::error::CoreError;
use tableprof_core::profiling::ProfileRequest;
use tableprof_core::types::RawProfilePayload;

use crate::config::UpstreamConfig;

/// Maximum number of characters of an error response body kept for diagnostics.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Anything that can produce a raw profiling payload for a table.
#[async_trait]
pub trait ProfilingSource: Send + Sync {
    /// Fetch the raw payload for one table.
    ///
    /// Returns `UpstreamUnreachable`, `UpstreamError` or `UpstreamMalformed`
    /// on failure.
    async fn fetch(&self, request: &ProfileRequest) -> Result<RawProfilePayload, CoreError>;
}

/// Errors constructing a [`ProfilingClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid profiling API URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client for the upstream profiling service.
pub struct ProfilingClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ProfilingClient {
    /// Build a client whose every request is bounded by `config.timeout`.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ProfilingSource for ProfilingClient {
    async fn fetch(&self, request: &ProfileRequest) -> Result<RawProfilePayload, CoreError> {
        tracing::debug!(target_table = %request, url = %self.base_url, "Fetching profiling data");

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("source_key", request.source_key.as_str()),
                ("schema_name", request.schema_name.as_str()),
                ("table_name", request.table_name.as_str()),
            ])
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CoreError::UpstreamError {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let body = response.text().await.map_err(unreachable)?;
        serde_json::from_str(&body).map_err(|e| CoreError::UpstreamMalformed(e.to_string()))
    }
}

/// Map a transport-level failure to `UpstreamUnreachable`, keeping the
/// innermost cause (e.g. "Connection refused") in the message.
fn unreachable(err: reqwest::Error) -> CoreError {
    if err.is_timeout() {
        return CoreError::UpstreamUnreachable(format!("request timed out: {err}"));
    }
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    CoreError::UpstreamUnreachable(message)
}

/// Truncate a response body to [`MAX_ERROR_BODY_CHARS`] characters.
fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}
